use clap::{Arg, Command};

pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new("otp-ttl-seconds")
            .long("otp-ttl-seconds")
            .help("Lifetime of an issued passcode in seconds")
            .default_value("300")
            .env("OTPGATE_OTP_TTL_SECONDS")
            .value_parser(clap::value_parser!(u64).range(1..)),
    )
}
