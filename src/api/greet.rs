#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, param::Path, payload::PlainText };

use crate::utils::greet_utils::{self, RequestDebug};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct GreetApi;

struct ReqGreet
{
    name: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqGreet {
    type Req = ReqGreet;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(64);
        s.push_str("  Path parameters:");
        s.push_str("\n    name: ");
        s.push_str(&self.name);
        s
    }
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl GreetApi {
    /** Greet the caller by name.  The name is the percent-decoded path
     * segment, substituted into the response verbatim.
     */
    #[oai(path = "/greet/:name", method = "get")]
    async fn greet(&self, http_req: &Request, name: Path<String>) -> PlainText<String> {
        // Package the request parameters.
        let req = ReqGreet { name: name.0 };

        // Conditional logging depending on log level.
        greet_utils::debug_request(http_req, &req);

        PlainText(format!("Hello {}!", req.name))
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::Route;
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use poem_openapi::OpenApiService;

    use super::{GreetApi, ReqGreet};
    use crate::utils::greet_utils::RequestDebug;

    fn test_client() -> TestClient<Route> {
        let service = OpenApiService::new(GreetApi, "test", "0.1");
        TestClient::new(Route::new().nest("/", service))
    }

    #[tokio::test]
    async fn greet_substitutes_the_name() {
        let cli = test_client();
        let resp = cli.get("/greet/Alice").send().await;
        resp.assert_status_is_ok();
        resp.assert_content_type("text/plain; charset=utf-8");
        resp.assert_text("Hello Alice!").await;
    }

    #[tokio::test]
    async fn greet_decodes_percent_encoding() {
        let cli = test_client();
        let resp = cli.get("/greet/John%20Doe").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("Hello John Doe!").await;
    }

    #[tokio::test]
    async fn greet_accepts_non_ascii_names() {
        // Percent-encoded UTF-8 for 世界.
        let cli = test_client();
        let resp = cli.get("/greet/%E4%B8%96%E7%95%8C").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("Hello 世界!").await;
    }

    #[tokio::test]
    async fn greet_requires_a_name_segment() {
        let cli = test_client();
        let resp = cli.get("/greet/").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);

        let resp = cli.get("/greet").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn greet_takes_exactly_one_segment() {
        let cli = test_client();
        let resp = cli.get("/greet/a/b").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[test]
    fn request_info_includes_the_name() {
        let req = ReqGreet { name: "Alice".to_string() };
        assert!(req.get_request_info().contains("name: Alice"));
    }
}
