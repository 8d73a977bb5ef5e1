//! Command line interface for the `ntp-mode6` query tool.
//!
//! The definition is shared with `build.rs`, which renders the man page, so
//! it depends on nothing but `clap`.

use clap::Parser;

/// Command line arguments for the `ntp-mode6` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ntp-mode6",
    version,
    about = "Send one NTP mode 6 control query and print the reply"
)]
pub struct Cli {
    /// Server to query.
    #[arg(default_value = "localhost")]
    pub host: String,

    /// UDP port of the server.
    #[arg(short, long, default_value_t = 123)]
    pub port: u16,

    /// Operation: a name such as `readvar` or `readstat`, or a number 0-31.
    #[arg(short, long, default_value = "readvar")]
    pub opcode: String,

    /// Association id to address; 0 is the system association.
    #[arg(short, long, default_value_t = 0)]
    pub association: u16,

    /// Request data, such as a comma-separated variable list.
    #[arg(long)]
    pub data: Option<String>,

    /// Wait for the first response fragment, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Wait for each later response fragment, in milliseconds.
    #[arg(long, default_value_t = 3000)]
    pub secondary_timeout_ms: u64,

    /// Protocol version stamped on the request.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub ntp_version: u8,

    /// Key id for signed requests.
    #[arg(long, requires = "key")]
    pub key_id: Option<u32>,

    /// MD5 secret for signed requests.
    #[arg(long, requires = "key_id")]
    pub key: Option<String>,

    /// Sign the request with the configured key.
    #[arg(long, requires = "key")]
    pub authenticate: bool,

    /// Increase diagnostic output; repeat for packet dumps.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,
}
