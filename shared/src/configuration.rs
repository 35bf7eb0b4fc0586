use crate::error::EcsnvError;
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "ECSNV_";

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_string"
    )]
    pub cluster: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_string"
    )]
    pub service: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_path"
    )]
    pub file: Option<PathBuf>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_string"
    )]
    pub profile: Option<String>,
}

impl Configuration {
    /// Layers `ECSNV_*` environment variables under the values given on the
    /// command line, then validates the result. Nothing here touches AWS.
    pub fn load(flags: Configuration) -> Result<Self, EcsnvError> {
        let config: Configuration = Figment::from(Serialized::defaults(Configuration::default()))
            .merge(Env::prefixed(ENV_PREFIX).only(&["cluster", "service", "file", "profile"]))
            // flags that were not given are skipped on serialization, so they
            // never blank out an environment value
            .merge(Serialized::defaults(flags.normalized()))
            .extract()
            .map_err(|e| EcsnvError::InvalidConfig(e.to_string()))?;

        let config = config.normalized();
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), EcsnvError> {
        if self.service.is_some() && self.cluster.is_none() {
            return Err(EcsnvError::Config(
                r#"required flag(s) "cluster" not set. Service should be paired with cluster."#
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Empty strings mean "not given".
    fn normalized(self) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            cluster: non_empty(self.cluster),
            service: non_empty(self.service),
            file: self.file.filter(|f| !f.as_os_str().is_empty()),
            profile: non_empty(self.profile),
        }
    }
}

// `Env` hands over `ECSNV_CLUSTER=2024` as a number and `=true` as a bool;
// names are taken verbatim whatever they parse as.
struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number or bool")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    deserializer.deserialize_any(ScalarVisitor).map(Some)
}

fn scalar_path<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PathBuf>, D::Error> {
    deserializer
        .deserialize_any(ScalarVisitor)
        .map(|path| Some(PathBuf::from(path)))
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration {{ cluster: {:?}, service: {:?}, file: {:?}, profile: {:?} }}",
            self.cluster, self.service, self.file, self.profile
        )
    }
}
