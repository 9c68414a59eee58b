#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use log::{info, error, LevelFilter};
use serde::Deserialize;
use std::{env, fs, path::Path};
use lazy_static::lazy_static;
use structopt::StructOpt;

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

// Server utilities
use crate::utils::errors::Errors;
use crate::utils::paths::get_absolute_path;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// File locations. Tilde and environment variable references are expanded
// before use.
const ENV_CONFIG_FILE      : &str = "HOME_SERVER_CONFIG_FILE";
const DEFAULT_CONFIG_FILE  : &str = "~/.home_server/home_server.toml";
const LOG4RS_CONFIG_FILE   : &str = "~/.home_server/log4rs.yml";

// Networking.
const DEFAULT_HTTP_ADDR    : &str = "127.0.0.1";
const DEFAULT_HTTP_PORT    : u16  = 5000;

// Console logging pattern used when no log4rs configuration file is installed.
const DEFAULT_LOG_PATTERN  : &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Assign the command line arguments BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref SERVER_ARGS: ServerArgs = init_server_args();
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// CommandLineArgs:
// ---------------------------------------------------------------------------
#[derive(Debug, StructOpt)]
#[structopt(name = "home_server_args", about = "Command line arguments for the home server.")]
pub struct ServerArgs {
    /// Specify the server configuration file.
    ///
    /// The configuration file path is calculated using the following
    /// priority order:
    ///
    ///   1. If set, the value of the HOME_SERVER_CONFIG_FILE environment variable,
    ///
    ///   2. Otherwise, if set, the value of the --config-file command line argument,
    ///
    ///   3. Otherwise, ~/.home_server/home_server.toml
    ///
    #[structopt(short, long)]
    pub config_file: Option<String>,
}

// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct RuntimeCtx {
    pub parms: Parms,
    pub server_args: &'static ServerArgs,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
    pub debug: bool,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Home Server".to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            debug: true,
        }
    }
}

// ***************************************************************************
//                            Argument Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_server_args:
// ---------------------------------------------------------------------------
/** Get the command line arguments. */
fn init_server_args() -> ServerArgs {
    let args = ServerArgs::from_args();
    println!("{:?}", args);
    args
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs logging.  A log4rs.yml installed in the server's data
 * directory takes precedence and gives operators full control.  Otherwise a
 * console configuration is built in code, with the root level tracking the
 * configured debug flag.
 */
pub fn init_log(debug: bool) {
    // Use the installed logging configuration when there is one.
    let logconfig = get_absolute_path(LOG4RS_CONFIG_FILE);
    if Path::new(&logconfig).is_file() {
        match log4rs::init_file(logconfig.clone(), Default::default()) {
            Ok(_) => (),
            Err(e) => {
                println!("{}", e);
                let s = format!("{}", Errors::Log4rsInitialization(logconfig));
                panic!("{}", s);
            },
        }
        info!("Log4rs initialized using: {}", logconfig);
        return;
    }

    // Console-only setup so a bare checkout runs without any preparation.
    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
        .build();
    let console_config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level));
    match console_config {
        Ok(c) => {
            match log4rs::init_config(c) {
                Ok(_) => (),
                Err(e) => {
                    println!("{}", e);
                    let s = format!("{}", Errors::Log4rsInitialization("<console>".to_string()));
                    panic!("{}", s);
                },
            }
        },
        Err(e) => {
            println!("{}", e);
            let s = format!("{}", Errors::Log4rsInitialization("<console>".to_string()));
            panic!("{}", s);
        },
    }
    info!("Log4rs initialized with console defaults at level {}.", level);
}

/// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_config_file:
// ---------------------------------------------------------------------------
fn get_config_file() -> String {
    // Order of precedence:
    //  1. Environment variable
    //  2. Command line --config-file argument
    //  3. Default location
    //
    let config_file = env::var(ENV_CONFIG_FILE).unwrap_or_else(
        |_| {
            match SERVER_ARGS.config_file.clone() {
                Some(f) => f,
                None => DEFAULT_CONFIG_FILE.to_string(),
            }
        });

    // Canonicalize the path.
    get_absolute_path(&config_file)
}

// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file specified
 * either through an environment variable or as a command line argument.  If
 * neither are provided, an attempt is made to use the default file path.  A
 * missing file is not an error: the server runs on default values.
 */
fn get_parms() -> Result<Parms> {
    // Resolve the config file path.
    let config_file_abs = get_config_file();

    // Read the cofiguration file.
    info!("{}", Errors::ReadingConfigFile(config_file_abs.clone()));
    let contents = match fs::read_to_string(&config_file_abs) {
        Ok(c) => c,
        Err(_) => {
            println!("Unable to read configuration at {}. Using default values.", config_file_abs);
            return Ok(Parms { config_file: Default::default(), config: Config::new() });
        }
    };

    // Parse the toml configuration.
    let config : Config = match toml::from_str(&contents) {
        Ok(c)  => c,
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::TOMLParseError(config_file_abs), e);
            error!("{}", msg);
            return Result::Err(anyhow!(msg));
        }
    };

    Ok(Parms { config_file: config_file_abs, config })
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> RuntimeCtx {
    // If this fails the application aborts.
    let parms = get_parms().expect("FAILED to read configuration file.");
    RuntimeCtx { parms, server_args: &SERVER_ARGS }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use crate::utils::config::Config;

    #[test]
    fn print_config() {
        println!("{:?}", Config::new());
    }

    #[test]
    fn default_config() {
        let config = Config::new();
        assert_eq!(config.title, "Home Server");
        assert_eq!(config.http_addr, "127.0.0.1");
        assert_eq!(config.http_port, 5000);
        assert!(config.debug);
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
            title = "Home Server"
            http_addr = "0.0.0.0"
            http_port = 8080
            debug = false
        "#;
        let config: Config = toml::from_str(toml_str).expect("config should parse");
        assert_eq!(config.title, "Home Server");
        assert_eq!(config.http_addr, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
        assert!(!config.debug);
    }
}
