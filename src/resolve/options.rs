//! Resolution options

use crate::cmdline::TokenizerOptions;
use serde::Deserialize;

/// Toggles for every source; the strict defaults suit most applications.
///
/// Deserializable with missing fields taking their defaults, so it can be
/// embedded in an application's own configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderOptions {
    /// Let the command line or environment name the external property file
    pub allow_property_file_redirect: bool,
    /// Accept `/key` and `/key=value` on the command line
    pub windows_key_compatibility: bool,
    /// Fail on command-line tokens that are neither keys nor values
    pub fail_on_dangling_token: bool,
    /// Accept `--key value`; when false only `--key=value` carries a value
    pub allow_value_without_equal_sign: bool,
    pub fail_on_unknown_cmd_property: bool,
    /// Only honoured when an environment prefix is given
    pub fail_on_unknown_env_property: bool,
    pub fail_on_unknown_file_property: bool,
    pub fail_on_unknown_resource_property: bool,
    /// Fail when an explicitly named resource does not exist
    pub fail_on_missing_resource: bool,
    pub fail_on_missing_property_file: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            allow_property_file_redirect: true,
            windows_key_compatibility: false,
            fail_on_dangling_token: true,
            allow_value_without_equal_sign: true,
            fail_on_unknown_cmd_property: true,
            fail_on_unknown_env_property: true,
            fail_on_unknown_file_property: false,
            fail_on_unknown_resource_property: false,
            fail_on_missing_resource: true,
            fail_on_missing_property_file: true,
        }
    }
}

impl LoaderOptions {
    pub fn tokenizer(&self) -> TokenizerOptions {
        TokenizerOptions {
            windows_compat: self.windows_key_compatibility,
            strict_on_dangling: self.fail_on_dangling_token,
        }
    }
}
