#![forbid(unsafe_code)]

use anyhow::Result;
use lazy_static::lazy_static;
use log::info;
use poem::{listener::TcpListener, Route};
use poem_openapi::OpenApiService;

// Greet Server Utilities
use crate::api::greet::GreetApi;
use crate::api::version::VersionApi;
use crate::api::welcome::WelcomeApi;
use crate::utils::config::{init_log, init_runtime_context, RuntimeCtx, GREET_ARGS};
use crate::utils::errors::Errors;

// Modules
mod api;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "GreetServer"; // for poem logging

// From cargo.toml.
const SERVER_VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Lazily initialize the parameters variable so that is has a 'static lifetime.
// We exit if we can't read our parameters or create the data directories.
lazy_static! {
    static ref RUNTIME_CTX: RuntimeCtx = init_runtime_context();
}

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // --------------- Initialize Greet Server --------
    // Announce ourselves.
    println!("Starting greet_server!");

    // Initialize the server.
    greet_init();

    // Support the administrative short circuit that only creates the
    // data directories and then exits.
    if GREET_ARGS.create_dirs_only {
        println!("Data directories created under {}.", RUNTIME_CTX.greet_dirs.root_dir);
        return Ok(());
    }

    // --------------- Main Loop Set Up ---------------
    // Assign base URL.
    let greet_url = format!("{}:{}",
        RUNTIME_CTX.parms.config.http_addr,
        RUNTIME_CTX.parms.config.http_port);

    // Create the routes.
    let app = build_app(RUNTIME_CTX.parms.config.title.clone(), greet_url);

    // ------------------ Main Loop -------------------
    let addr = format!("{}{}", "0.0.0.0:", RUNTIME_CTX.parms.config.http_port);
    poem::Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run(app)
        .await
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// build_app:
// ---------------------------------------------------------------------------
/** Assemble the complete route table.  The two greeting endpoints and the
 * version endpoint are independent units combined into one OpenAPI service
 * that answers at the site root.  The generated specs and the swagger UI
 * hang off their own paths.
 */
fn build_app(title: String, server_url: String) -> Route {
    // Create a tuple with the independent endpoint structs.
    let endpoints = (WelcomeApi, GreetApi, VersionApi);
    let api_service =
        OpenApiService::new(endpoints, title, SERVER_VERSION.unwrap_or("unknown"))
            .server(server_url);

    // Allow the generated openapi specs to be retrieved from the server.
    let spec = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();

    // Create the routes.
    let ui = api_service.swagger_ui();
    Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .at("/spec", spec)
        .at("/spec_yaml", spec_yaml)
}

// ---------------------------------------------------------------------------
// greet_init:
// ---------------------------------------------------------------------------
/** Initialize all subsystems other than those needed to configure the main
 * loop processor.
 */
fn greet_init() {
    // Configure our log.
    init_log();

    // Force the reading of input parameters and initialization of the
    // runtime context.
    info!("{}", Errors::InputParms(format!("{:#?}", *RUNTIME_CTX)));

    // Log build info.
    print_version_info();
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    // Log build info.
    info!("{}.", format!("\n*** Running GREET_SERVER={}, BRANCH={}, COMMIT={}, DIRTY={}, SRC_TS={}, RUSTC={}",
                        SERVER_VERSION.unwrap_or("unknown"),
                        env!("GIT_BRANCH"),
                        env!("GIT_COMMIT_SHORT"),
                        env!("GIT_DIRTY"),
                        env!("SOURCE_TIMESTAMP"),
                        env!("RUSTC_VERSION")),
    );
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::Route;
    use poem::http::StatusCode;
    use poem::test::TestClient;

    use super::build_app;

    fn test_client() -> TestClient<Route> {
        let app = build_app("Greeting Server".to_string(),
                            "http://localhost:8080".to_string());
        TestClient::new(app)
    }

    #[tokio::test]
    async fn root_serves_the_welcome_banner() {
        let cli = test_client();
        let resp = cli.get("/").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("Welcome to Spring Boot!").await;
    }

    #[tokio::test]
    async fn greet_serves_the_named_greeting() {
        let cli = test_client();
        let resp = cli.get("/greet/Alice").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("Hello Alice!").await;
    }

    #[tokio::test]
    async fn unknown_paths_fall_through_to_404() {
        let cli = test_client();
        let resp = cli.get("/unknown").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);

        let resp = cli.get("/greet/").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn repeated_requests_return_identical_responses() {
        let cli = test_client();
        for _ in 0..3 {
            let resp = cli.get("/").send().await;
            resp.assert_status_is_ok();
            resp.assert_text("Welcome to Spring Boot!").await;

            let resp = cli.get("/greet/Alice").send().await;
            resp.assert_status_is_ok();
            resp.assert_text("Hello Alice!").await;
        }
    }

    #[tokio::test]
    async fn spec_document_carries_the_service_title() {
        let cli = test_client();
        let resp = cli.get("/spec").send().await;
        resp.assert_status_is_ok();

        let json = resp.json().await;
        json.value()
            .object()
            .get("info")
            .object()
            .get("title")
            .assert_string("Greeting Server");
    }

    #[tokio::test]
    async fn spec_yaml_is_served() {
        let cli = test_client();
        let resp = cli.get("/spec_yaml").send().await;
        resp.assert_status_is_ok();
    }
}
