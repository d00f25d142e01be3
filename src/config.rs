//! Library configuration.

use crate::common::*;
use crate::generate::GenerateInit;
use once_cell::sync::Lazy;
use semver::{Version, VersionReq};

pub use generation::*;
pub use preprocess::*;

pub static CONFIG_VERSION: Lazy<VersionReq> = Lazy::new(|| VersionReq::parse("0.1.0").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_version")]
    pub version: Version,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

mod preprocess {
    use super::*;

    /// Image preprocessing options.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    pub struct PreprocessConfig {
        /// Target spatial size of the model input.
        #[serde(default = "default_image_size")]
        pub image_size: NonZeroUsize,
        /// Per-channel normalization mean.
        #[serde(default = "default_image_mean")]
        pub image_mean: [R64; 3],
        /// Per-channel normalization standard deviation.
        #[serde(default = "default_image_std")]
        pub image_std: [R64; 3],
        /// Whether to crop the largest centered square before resizing.
        #[serde(default)]
        pub do_center_crop: bool,
        /// The device where the preprocessor works on.
        #[serde(with = "tch_serde::serde_device", default = "default_device")]
        pub device: Device,
    }

    impl Default for PreprocessConfig {
        fn default() -> Self {
            Self {
                image_size: default_image_size(),
                image_mean: default_image_mean(),
                image_std: default_image_std(),
                do_center_crop: false,
                device: default_device(),
            }
        }
    }

    fn default_image_size() -> NonZeroUsize {
        NonZeroUsize::new(224).unwrap()
    }

    fn default_image_mean() -> [R64; 3] {
        [r64(0.48145466), r64(0.4578275), r64(0.40821073)]
    }

    fn default_image_std() -> [R64; 3] {
        [r64(0.26862954), r64(0.26130258), r64(0.27577711)]
    }

    fn default_device() -> Device {
        Device::Cpu
    }
}

mod generation {
    use super::*;

    /// Autoregressive generation options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GenerationConfig {
        #[serde(default = "default_do_sample")]
        pub do_sample: bool,
        #[serde(default = "default_temperature")]
        pub temperature: R64,
        #[serde(default = "default_max_new_tokens")]
        pub max_new_tokens: NonZeroUsize,
        /// Keywords that terminate generation once they appear in the decoded
        /// continuation.
        #[serde(default = "default_keywords")]
        pub keywords: Vec<String>,
    }

    impl Default for GenerationConfig {
        fn default() -> Self {
            Self {
                do_sample: default_do_sample(),
                temperature: default_temperature(),
                max_new_tokens: default_max_new_tokens(),
                keywords: default_keywords(),
            }
        }
    }

    impl From<&GenerationConfig> for GenerateInit {
        fn from(config: &GenerationConfig) -> Self {
            Self {
                do_sample: config.do_sample,
                temperature: config.temperature,
                max_new_tokens: config.max_new_tokens.get(),
            }
        }
    }

    fn default_do_sample() -> bool {
        true
    }

    fn default_temperature() -> R64 {
        r64(0.2)
    }

    fn default_max_new_tokens() -> NonZeroUsize {
        NonZeroUsize::new(1024).unwrap()
    }

    fn default_keywords() -> Vec<String> {
        vec!["###".into()]
    }
}

pub fn deserialize_version<'de, D>(deserializer: D) -> Result<Version, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    let version = Version::parse(&text).map_err(|err| {
        D::Error::custom(format!(
            "failed to parse version number '{}': {:?}",
            text, err
        ))
    })?;

    if !CONFIG_VERSION.matches(&version) {
        return Err(D::Error::custom(format!(
            "incompatible version: get '{}', but it is incompatible with requirement '{}'",
            version, &*CONFIG_VERSION,
        )));
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() -> Result<()> {
        let config: Config = json5::from_str(r#"{ version: "0.1.0" }"#)?;
        assert_eq!(config.preprocess.image_size.get(), 224);
        assert!(!config.preprocess.do_center_crop);
        assert!(config.generation.do_sample);
        assert_eq!(config.generation.temperature, r64(0.2));
        assert_eq!(config.generation.max_new_tokens.get(), 1024);
        assert_eq!(config.generation.keywords, vec!["###".to_string()]);
        Ok(())
    }

    #[test]
    fn config_overrides() -> Result<()> {
        let config: Config = json5::from_str(
            r#"{
                version: "0.1.0",
                preprocess: { image_size: 336, do_center_crop: true },
                generation: { do_sample: false, max_new_tokens: 16 },
            }"#,
        )?;
        assert_eq!(config.preprocess.image_size.get(), 336);
        assert!(config.preprocess.do_center_crop);

        let init = GenerateInit::from(&config.generation);
        assert!(!init.do_sample);
        assert_eq!(init.max_new_tokens, 16);
        Ok(())
    }

    #[test]
    fn config_rejects_incompatible_version() {
        let result: Result<Config, _> = json5::from_str(r#"{ version: "2.0.0" }"#);
        assert!(result.is_err());
    }
}
