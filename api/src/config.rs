use std::time::Duration;

use clap::{Parser, ValueEnum};
use direct_upload_storage::{OssConfig, DEFAULT_KEY_PREFIX, DEFAULT_MAX_UPLOAD_SIZE};
use direct_upload_types::UploadMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Post,
    Put,
}

impl From<MethodArg> for UploadMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Post => UploadMethod::Post,
            MethodArg::Put => UploadMethod::Put,
        }
    }
}

#[derive(Debug, Parser)]
pub struct Config {
    #[clap(short, long, env, default_value_t = String::from("127.0.0.1"))]
    pub host: String,
    #[clap(short, long, env, default_value_t = 7205)]
    pub port: u16,

    #[clap(long, env, default_value_t = String::from("production"))]
    pub env: String,

    #[clap(long, env)]
    pub honeycomb_team: Option<String>,
    #[clap(long, env, default_value_t = String::from("dev"))]
    pub honeycomb_dataset: String,

    #[clap(long, env, hide_env_values = true)]
    pub oss_access_key: String,
    #[clap(long, env, hide_env_values = true)]
    pub oss_access_secret: String,
    #[clap(long, env)]
    pub oss_bucket: String,
    #[clap(long, env, help = "Region, e.g. oss-cn-hangzhou")]
    pub oss_region: String,
    #[clap(long, env, help = "Public domain bound to the bucket, used for access URLs")]
    pub oss_custom_domain: Option<String>,
    #[clap(long, env, help = "Override the storage endpoint, e.g. for a local emulator")]
    pub oss_endpoint: Option<String>,
    #[clap(long, env, help = "Put the bucket name in the path instead of the host")]
    pub oss_path_style: bool,

    #[clap(long, env, default_value_t = DEFAULT_MAX_UPLOAD_SIZE)]
    pub max_upload_size: u64,
    #[clap(long, env, default_value_t = 600)]
    pub upload_expiry_secs: u64,
    #[clap(long, env, default_value_t = String::from(DEFAULT_KEY_PREFIX))]
    pub key_prefix: String,
    #[clap(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    pub randomize_keys: bool,
    #[clap(long, env, value_enum, default_value_t = MethodArg::Post)]
    pub default_method: MethodArg,
    #[clap(
        long,
        env,
        value_delimiter = ',',
        help = "Comma separated content types that may be uploaded. Empty allows all"
    )]
    pub allowed_content_types: Vec<String>,
}

impl Config {
    pub fn oss_config(&self) -> OssConfig {
        OssConfig {
            access_key_id: self.oss_access_key.clone(),
            access_key_secret: self.oss_access_secret.clone(),
            bucket: self.oss_bucket.clone(),
            region: self.oss_region.clone(),
            custom_domain: self.oss_custom_domain.clone().filter(|d| !d.is_empty()),
            endpoint: self.oss_endpoint.clone().filter(|e| !e.is_empty()),
            path_style: self.oss_path_style,
            max_upload_size: self.max_upload_size,
            expiry: Duration::from_secs(self.upload_expiry_secs),
            key_prefix: self.key_prefix.clone(),
            randomize_keys: self.randomize_keys,
            default_method: self.default_method.into(),
            allowed_content_types: self
                .allowed_content_types
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}
