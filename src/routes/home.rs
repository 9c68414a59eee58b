#![forbid(unsafe_code)]

use poem_openapi::{payload::Html, OpenApi};

// The one page this server exists to serve.
const HOME_BODY: &str = "<p>Lebron James!</p>";

// ***************************************************************************
//                           Endpoint Definitions
// ***************************************************************************
pub struct HomeApi;

// ***************************************************************************
//                             OpenAPI Endpoints
// ***************************************************************************
#[OpenApi]
impl HomeApi {
    /// Serve the home page at the root path.
    #[oai(path = "/", method = "get")]
    async fn root(&self) -> Html<String> {
        Html(HOME_BODY.to_string())
    }

    /// Serve the same page at /home so either address works in a browser.
    #[oai(path = "/home", method = "get")]
    async fn home(&self) -> Html<String> {
        Html(HOME_BODY.to_string())
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::{http::StatusCode, test::TestClient, Route};
    use poem_openapi::OpenApiService;

    use super::HomeApi;

    /** Build the same route table main assembles, minus the listener. */
    fn test_app() -> Route {
        let api_service = OpenApiService::new(HomeApi, "Home Server", "test");
        Route::new().nest("/", api_service)
    }

    #[tokio::test]
    async fn get_root_returns_home_page() {
        let cli = TestClient::new(test_app());
        let resp = cli.get("/").send().await;
        resp.assert_status_is_ok();
        resp.assert_header("content-type", "text/html; charset=utf-8");
        resp.assert_text("<p>Lebron James!</p>").await;
    }

    #[tokio::test]
    async fn get_home_matches_root() {
        let cli = TestClient::new(test_app());
        let resp = cli.get("/home").send().await;
        resp.assert_status_is_ok();
        resp.assert_header("content-type", "text/html; charset=utf-8");
        resp.assert_text("<p>Lebron James!</p>").await;
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let cli = TestClient::new(test_app());
        let resp = cli.get("/missing").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let cli = TestClient::new(test_app());
        for _ in 0..3 {
            let resp = cli.get("/").send().await;
            resp.assert_status_is_ok();
            resp.assert_text("<p>Lebron James!</p>").await;
        }
    }
}
