use clap::{Arg, Command};

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("smtp-host")
                .long("smtp-host")
                .help("SMTP relay host (STARTTLS); passcodes are only logged when unset")
                .env("OTPGATE_SMTP_HOST")
                .requires_all(["smtp-sender", "smtp-password"]),
        )
        .arg(
            Arg::new("smtp-port")
                .long("smtp-port")
                .help("SMTP relay port")
                .default_value("587")
                .env("OTPGATE_SMTP_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("smtp-sender")
                .long("smtp-sender")
                .help("From address for passcode emails")
                .env("OTPGATE_SMTP_SENDER"),
        )
        .arg(
            Arg::new("smtp-username")
                .long("smtp-username")
                .help("SMTP login (default: the sender address)")
                .env("OTPGATE_SMTP_USERNAME"),
        )
        .arg(
            Arg::new("smtp-password")
                .long("smtp-password")
                .help("SMTP password")
                .env("OTPGATE_SMTP_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new("smtp-timeout-seconds")
                .long("smtp-timeout-seconds")
                .help("SMTP connection timeout in seconds")
                .default_value("10")
                .env("OTPGATE_SMTP_TIMEOUT_SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("email-template")
                .long("email-template")
                .help("Path to an HTML template with {{otp}} and {{validity}} placeholders")
                .env("OTPGATE_EMAIL_TEMPLATE"),
        )
}
