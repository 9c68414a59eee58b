#![forbid(unsafe_code)]

use anyhow::Result;
use lazy_static::lazy_static;
use log::{info, warn};
use poem::{listener::TcpListener, Route};
use poem_openapi::OpenApiService;

// Server utilities
use crate::routes::home::HomeApi;
use crate::utils::config::{init_log, init_runtime_context, RuntimeCtx};
use crate::utils::errors::Errors;

// Modules
mod routes;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "HomeServer"; // for poem logging

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Lazily initialize the parameters variable so that is has a 'static lifetime.
// We exit if we can't read our parameters.
lazy_static! {
    static ref RUNTIME_CTX: RuntimeCtx = init_runtime_context();
}

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // --------------- Initialize Server --------------
    // Announce ourselves.
    println!("Starting home_server!");

    // Initialize the server.
    server_init();

    // --------------- Main Loop Set Up ---------------
    // Assign base URL.
    let server_url = format!("http://{}:{}/",
        RUNTIME_CTX.parms.config.http_addr,
        RUNTIME_CTX.parms.config.http_port);

    let api_service =
        OpenApiService::new(HomeApi,
                            RUNTIME_CTX.parms.config.title.clone(),
                            option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"))
            .server(server_url.clone());

    // Create the routes and run the server.
    let addr = format!("{}:{}",
        RUNTIME_CTX.parms.config.http_addr,
        RUNTIME_CTX.parms.config.http_port);
    let app = Route::new().nest("/", api_service);

    info!("Running on {}", server_url);

    // ------------------ Main Loop -------------------
    poem::Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run(app)
        .await
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// server_init:
// ---------------------------------------------------------------------------
/** Initialize all subsystems other than those needed to configure the main
 * loop processor.
 */
fn server_init() {
    // Force the reading of input parameters so the log setup below can
    // honor the configured debug flag.
    let debug = RUNTIME_CTX.parms.config.debug;

    // Configure our log.
    init_log(debug);

    // Log the runtime context.
    info!("{}", Errors::InputParms(format!("{:#?}", *RUNTIME_CTX)));

    // Log build info.
    print_version_info();

    // Development launch guard.
    if debug {
        warn!("Debug mode is on. This server is intended for local development only.");
    }
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    info!("{}.", format!("\n*** Running {}={}",
                        SERVER_NAME,
                        option_env!("CARGO_PKG_VERSION").unwrap_or("unknown")),
    );
}
