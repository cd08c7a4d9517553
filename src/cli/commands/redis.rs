use clap::{Arg, Command};

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("redis-host")
                .long("redis-host")
                .help("Redis host holding pending passcodes")
                .default_value("127.0.0.1")
                .env("OTPGATE_REDIS_HOST"),
        )
        .arg(
            Arg::new("redis-port")
                .long("redis-port")
                .help("Redis port")
                .default_value("6379")
                .env("OTPGATE_REDIS_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("redis-db")
                .long("redis-db")
                .help("Redis logical database")
                .default_value("0")
                .env("OTPGATE_REDIS_DB")
                .value_parser(clap::value_parser!(i64).range(0..)),
        )
        .arg(
            Arg::new("redis-password")
                .long("redis-password")
                .help("Redis password")
                .env("OTPGATE_REDIS_PASSWORD")
                .hide_env_values(true),
        )
}
