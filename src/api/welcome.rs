#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::PlainText };

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct WelcomeApi;

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl WelcomeApi {
    /** Serve the fixed welcome banner at the site root. */
    #[oai(path = "/", method = "get")]
    async fn index(&self) -> PlainText<String> {
        PlainText("Welcome to Spring Boot!".to_string())
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::Route;
    use poem::test::TestClient;
    use poem_openapi::OpenApiService;

    use super::WelcomeApi;

    fn test_client() -> TestClient<Route> {
        let service = OpenApiService::new(WelcomeApi, "test", "0.1");
        TestClient::new(Route::new().nest("/", service))
    }

    #[tokio::test]
    async fn welcome_body_is_exact() {
        let cli = test_client();
        let resp = cli.get("/").send().await;
        resp.assert_status_is_ok();
        resp.assert_content_type("text/plain; charset=utf-8");
        resp.assert_text("Welcome to Spring Boot!").await;
    }

    #[tokio::test]
    async fn welcome_is_idempotent() {
        let cli = test_client();
        for _ in 0..3 {
            let resp = cli.get("/").send().await;
            resp.assert_status_is_ok();
            resp.assert_text("Welcome to Spring Boot!").await;
        }
    }
}
