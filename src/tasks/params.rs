// ABOUTME: Shared option handling for task parameters.
// ABOUTME: Ansible boolean coercion, required-option checks, image refs and credential pairs.

use crate::diagnostics::{Diagnostics, Warning};
use crate::types::{Credentials, ImageRef, Secret};

use super::ParamsError;

/// Fail with every required option that is absent, in declaration order.
pub(crate) fn check_required(options: &[(&'static str, bool)]) -> Result<(), ParamsError> {
    let missing: Vec<&'static str> = options
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParamsError::MissingRequired(missing))
    }
}

/// Parse an image option, warning when skopeo will not recognise its transport.
pub(crate) fn image_option(
    option: &'static str,
    value: &str,
    diag: &mut Diagnostics,
) -> Result<ImageRef, ParamsError> {
    let image = ImageRef::parse(value).map_err(|source| ParamsError::Image { option, source })?;
    if image.transport().is_none() {
        diag.warn(Warning::missing_transport(format!(
            "{option} '{image}' has no transport prefix such as docker://; skopeo may reject it"
        )));
    }
    Ok(image)
}

/// Build an optional credential pair. Empty values count as absent.
///
/// When only one half is given the pair is dropped and a warning names the
/// option that was set, never its value.
pub(crate) fn credential_pair(
    prefix: &str,
    username: Option<String>,
    password: Option<Secret>,
    diag: &mut Diagnostics,
) -> Option<Credentials> {
    let username = username.filter(|u| !u.is_empty());
    let password = password.filter(|p| !p.is_empty());

    match (username, password) {
        (Some(username), Some(password)) => Some(Credentials::new(username, password)),
        (Some(_), None) => {
            diag.warn(Warning::incomplete_credentials(format!(
                "{prefix}_username is set but {prefix}_password is not; --{prefix}-creds omitted"
            )));
            None
        }
        (None, Some(_)) => {
            diag.warn(Warning::incomplete_credentials(format!(
                "{prefix}_password is set but {prefix}_username is not; --{prefix}-creds omitted"
            )));
            None
        }
        (None, None) => None,
    }
}

/// Ansible's boolean coercion for module options.
pub mod ansible_bool {
    use serde::Deserializer;
    use serde::de::{self, Unexpected, Visitor};
    use std::fmt;

    /// Interpret an Ansible boolean string, case-insensitively.
    pub fn parse(value: &str) -> Option<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "on" | "1" | "true" | "t" | "1.0" => Some(true),
            "n" | "no" | "off" | "0" | "false" | "f" | "0.0" => Some(false),
            _ => None,
        }
    }

    /// `deserialize_with` target for `Option<bool>` options. Null means unset.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionalAnsibleBool)
    }

    struct AnsibleBool;

    impl<'de> Visitor<'de> for AnsibleBool {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean (true/false, yes/no, on/off, 1/0)")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(Unexpected::Signed(v), &self)),
            }
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(Unexpected::Unsigned(v), &self)),
            }
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<bool, E> {
            if v == 0.0 {
                Ok(false)
            } else if v == 1.0 {
                Ok(true)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            parse(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    struct OptionalAnsibleBool;

    impl<'de> Visitor<'de> for OptionalAnsibleBool {
        type Value = Option<bool>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Option<bool>, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Option<bool>, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Option<bool>, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(AnsibleBool).map(Some)
        }
    }
}
