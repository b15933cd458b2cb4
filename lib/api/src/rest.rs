//! REST surface for the learning portal
//!
//! Thin handlers over the core pipelines and the user store: parse the
//! form or query input, call into the context, and emit a page through the
//! renderer seam. Pipeline failures become display-safe payloads; a page
//! render never propagates a process fault.

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::render::{JsonRenderer, PageRenderer};
use edurec_core::{Error, Prediction, Recommendation, StudentFeatures};
use edurec_store::{ArtifactStore, NewUser, UserRecord, UserStore};

/// Default k for similarity recommendations.
const DEFAULT_RECOMMEND_K: usize = 6;

/// Everything a request handler needs, loaded once at startup and shared
/// read-only. No ambient globals.
pub struct AppContext {
    pub artifacts: ArtifactStore,
    pub users: UserStore,
    renderer: Box<dyn PageRenderer>,
}

impl AppContext {
    pub fn new(artifacts: ArtifactStore, users: UserStore) -> Self {
        Self {
            artifacts,
            users,
            renderer: Box::new(JsonRenderer),
        }
    }

    pub fn with_renderer(
        artifacts: ArtifactStore,
        users: UserStore,
        renderer: Box<dyn PageRenderer>,
    ) -> Self {
        Self {
            artifacts,
            users,
            renderer,
        }
    }

    /// Render a page document with 200 OK.
    fn page(&self, template: &str, bindings: serde_json::Value) -> HttpResponse {
        self.page_with(HttpResponse::Ok(), template, bindings)
    }

    fn page_with(
        &self,
        mut builder: actix_web::HttpResponseBuilder,
        template: &str,
        bindings: serde_json::Value,
    ) -> HttpResponse {
        builder
            .content_type(self.renderer.content_type())
            .body(self.renderer.render(template, &bindings))
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(ctx: Arc<AppContext>, port: u16) -> std::io::Result<()> {
        let data = web::Data::from(ctx);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(data.clone())
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Route table, shared between the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/signup", web::get().to(signup_page))
        .route("/signup", web::post().to(signup))
        .route("/login", web::get().to(login_page))
        .route("/login", web::post().to(login))
        .route("/logout", web::get().to(logout))
        .route("/profile/{username}", web::get().to(profile))
        .route("/recommend", web::get().to(recommend_page))
        .route("/recommendation", web::post().to(recommendation))
        .route("/resources", web::get().to(resources))
        .route("/index_course", web::get().to(index_course))
        .route("/pred", web::get().to(pred_page))
        .route("/pred", web::post().to(predict_json))
        .route("/result", web::post().to(predict_form))
        .route("/dashboard", web::get().to(dashboard));
}

/// Public view of a user record: everything except the credential hash.
fn user_bindings(record: &UserRecord) -> serde_json::Value {
    json!({
        "id": record.id,
        "fullname": record.fullname,
        "dob": record.dob,
        "username": record.username,
        "email": record.email,
        "mobile": record.mobile,
        "created_at": record.created_at,
    })
}

async fn home(ctx: web::Data<AppContext>) -> ActixResult<HttpResponse> {
    let bindings = match ctx.artifacts.recommender().get() {
        Some(rec) => json!({ "data": rec.popular() }),
        None => json!({
            "data": [],
            "message": "Course recommendations are temporarily unavailable",
        }),
    };
    Ok(ctx.page("home", bindings))
}

async fn signup_page(ctx: web::Data<AppContext>) -> ActixResult<HttpResponse> {
    Ok(ctx.page("signup", json!({})))
}

async fn signup(
    ctx: web::Data<AppContext>,
    form: web::Form<NewUser>,
) -> ActixResult<HttpResponse> {
    let form = form.into_inner();
    // Kept so the form can be re-shown with its state on rejection. The
    // password is never echoed back.
    let submitted = json!({
        "fullname": form.fullname,
        "dob": form.dob,
        "username": form.username,
        "email": form.email,
        "mobile": form.mobile,
    });

    match ctx.users.insert_one(form) {
        Ok(record) => Ok(ctx.page("profile", json!({ "user_data": user_bindings(&record) }))),
        Err(Error::DuplicateUsername(username)) => Ok(ctx.page_with(
            HttpResponse::Conflict(),
            "signup",
            json!({
                "message": format!("Username '{username}' is already taken"),
                "form": submitted,
            }),
        )),
        Err(Error::InvalidInput(msg)) => Ok(ctx.page_with(
            HttpResponse::BadRequest(),
            "signup",
            json!({ "message": msg, "form": submitted }),
        )),
        Err(e) => {
            warn!("Signup failed: {e}");
            Ok(ctx.page_with(
                HttpResponse::InternalServerError(),
                "signup",
                json!({ "message": "Signup is temporarily unavailable", "form": submitted }),
            ))
        }
    }
}

async fn login_page(ctx: web::Data<AppContext>) -> ActixResult<HttpResponse> {
    Ok(ctx.page("login", json!({})))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(
    ctx: web::Data<AppContext>,
    form: web::Form<LoginForm>,
) -> ActixResult<HttpResponse> {
    match ctx.users.verify_login(&form.username, &form.password) {
        Ok(Some(record)) => {
            Ok(ctx.page("profile", json!({ "user_data": user_bindings(&record) })))
        }
        Ok(None) => Ok(ctx.page_with(
            HttpResponse::Unauthorized(),
            "login",
            json!({ "message": "Invalid username or password" }),
        )),
        Err(e) => {
            warn!("Login check failed: {e}");
            Ok(ctx.page_with(
                HttpResponse::InternalServerError(),
                "login",
                json!({ "message": "Login is temporarily unavailable" }),
            ))
        }
    }
}

async fn logout() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Found()
        .insert_header(("Location", "/"))
        .finish())
}

async fn profile(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let username = path.into_inner();
    match ctx.users.find_one(&username) {
        Some(record) => Ok(ctx.page("profile", json!({ "user_data": user_bindings(&record) }))),
        None => Ok(ctx.page_with(
            HttpResponse::NotFound(),
            "profile",
            json!({ "message": format!("No such user: {username}") }),
        )),
    }
}

async fn recommend_page(ctx: web::Data<AppContext>) -> ActixResult<HttpResponse> {
    Ok(ctx.page("recommend", json!({})))
}

#[derive(Deserialize)]
struct RecommendQuery {
    query: String,
    k: Option<usize>,
}

async fn recommendation(
    ctx: web::Data<AppContext>,
    form: web::Form<RecommendQuery>,
) -> ActixResult<HttpResponse> {
    let Some(recommender) = ctx.artifacts.recommender().get() else {
        return Ok(ctx.page(
            "recommendation",
            json!({ "message": "Course recommendations are temporarily unavailable" }),
        ));
    };

    let k = form.k.unwrap_or(DEFAULT_RECOMMEND_K);
    let result = recommender.recommend(&form.query, k);

    // The not-found signal and the default content render together.
    let not_found = matches!(result, Recommendation::NotFound { .. });
    let mut bindings = json!({ "query": form.query, "result": result });
    if not_found {
        bindings["message"] = json!("No matching course found, showing popular courses");
    }
    Ok(ctx.page("recommendation", bindings))
}

async fn resources(ctx: web::Data<AppContext>) -> ActixResult<HttpResponse> {
    Ok(ctx.page(
        "resources",
        json!({
            "sections": ["about", "help", "study-material"],
        }),
    ))
}

async fn index_course(ctx: web::Data<AppContext>) -> ActixResult<HttpResponse> {
    let bindings = match ctx.artifacts.recommender().get() {
        Some(rec) => json!({ "courses": rec.catalog().courses() }),
        None => json!({
            "courses": [],
            "message": "Course catalog is temporarily unavailable",
        }),
    };
    Ok(ctx.page("index_course", bindings))
}

async fn pred_page(ctx: web::Data<AppContext>) -> ActixResult<HttpResponse> {
    Ok(ctx.page("pred", json!({})))
}

#[derive(Deserialize)]
struct PredictRequest {
    features: Vec<f32>,
}

/// JSON prediction endpoint: raw feature array in documented order.
async fn predict_json(
    ctx: web::Data<AppContext>,
    req: web::Json<PredictRequest>,
) -> ActixResult<HttpResponse> {
    let features = match StudentFeatures::from_slice(&req.features) {
        Ok(f) => f,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() })));
        }
    };
    Ok(HttpResponse::Ok().json(ctx.artifacts.classifier().classify(&features)))
}

/// Form prediction endpoint: the named fields the predict page posts.
async fn predict_form(
    ctx: web::Data<AppContext>,
    form: web::Form<StudentFeatures>,
) -> ActixResult<HttpResponse> {
    let prediction = ctx.artifacts.classifier().classify(&form);
    let bindings = match &prediction {
        Prediction::Ranked { .. } => json!({ "prediction": prediction }),
        Prediction::Unavailable => json!({
            "prediction": prediction,
            "message": "Career prediction is temporarily unavailable",
        }),
    };
    Ok(ctx.page("result", bindings))
}

async fn dashboard(ctx: web::Data<AppContext>) -> ActixResult<HttpResponse> {
    let bindings = json!({
        "classifier_available": ctx.artifacts.classifier().is_loaded(),
        "recommender_available": ctx.artifacts.recommender().is_loaded(),
        "registered_users": ctx.users.count(),
    });
    Ok(ctx.page("dashboard", bindings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use edurec_core::{
        CareerClassifier, ClassifierHandle, ClassifierWeights, Course, CourseCatalog, CourseIndex,
        FeatureScaler, PopularCourse, Recommender, RecommenderHandle, SimilarityMatrix,
        FEATURE_COUNT,
    };

    fn fixture_recommender() -> Recommender {
        let index = CourseIndex::from_titles(vec![
            "Python for Data Science".to_string(),
            "Complete Python Bootcamp".to_string(),
        ])
        .unwrap();
        let matrix = SimilarityMatrix::new(vec![vec![1.0, 0.7], vec![0.7, 1.0]]).unwrap();
        let catalog = CourseCatalog::new(vec![
            Course {
                title: "Python for Data Science".to_string(),
                author: "Jose Portilla".to_string(),
                price: 12.99,
                num_subscribers: 5000,
                image_url: String::new(),
            },
            Course {
                title: "Complete Python Bootcamp".to_string(),
                author: "Jose Portilla".to_string(),
                price: 13.99,
                num_subscribers: 9000,
                image_url: String::new(),
            },
        ])
        .unwrap();
        let popular = vec![PopularCourse {
            title: "Complete Python Bootcamp".to_string(),
            author: "Jose Portilla".to_string(),
            avg_rating: 4.6,
            total_votes: 31000,
            image_url: String::new(),
        }];
        Recommender::new(index, matrix, catalog, popular).unwrap()
    }

    fn fixture_classifier() -> CareerClassifier {
        let scaler = FeatureScaler {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        };
        let weights = ClassifierWeights {
            labels: vec![
                "Software Engineer".to_string(),
                "Doctor".to_string(),
                "Teacher".to_string(),
                "Artist".to_string(),
            ],
            coefficients: vec![vec![0.1; FEATURE_COUNT]; 4],
            intercepts: vec![0.0; 4],
        };
        CareerClassifier::from_artifacts(scaler, weights).unwrap()
    }

    fn test_ctx() -> web::Data<AppContext> {
        let artifacts = ArtifactStore::from_handles(
            ClassifierHandle::Loaded(fixture_classifier()),
            RecommenderHandle::Loaded(fixture_recommender()),
        );
        web::Data::new(AppContext::new(artifacts, UserStore::in_memory()))
    }

    fn degraded_ctx() -> web::Data<AppContext> {
        let artifacts = ArtifactStore::from_handles(
            ClassifierHandle::Unavailable,
            RecommenderHandle::Unavailable,
        );
        web::Data::new(AppContext::new(artifacts, UserStore::in_memory()))
    }

    #[actix_web::test]
    async fn test_home_shows_popular() {
        let app =
            test::init_service(App::new().app_data(test_ctx()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["template"], "home");
        assert_eq!(
            body["bindings"]["data"][0]["title"],
            "Complete Python Bootcamp"
        );
    }

    #[actix_web::test]
    async fn test_recommendation_similar_branch() {
        let app =
            test::init_service(App::new().app_data(test_ctx()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/recommendation")
            .set_form([("query", "Python"), ("k", "5")])
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let result = &body["bindings"]["result"];
        assert_eq!(result["kind"], "similar");
        assert_eq!(result["matched_title"], "Python for Data Science");
        assert_eq!(
            result["courses"][0]["course"]["title"],
            "Complete Python Bootcamp"
        );
    }

    #[actix_web::test]
    async fn test_recommendation_not_found_renders_popular() {
        let app =
            test::init_service(App::new().app_data(test_ctx()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/recommendation")
            .set_form([("query", "quantum knitting")])
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let result = &body["bindings"]["result"];
        assert_eq!(result["kind"], "not_found");
        assert!(!result["popular"].as_array().unwrap().is_empty());
        assert!(body["bindings"]["message"].is_string());
    }

    #[actix_web::test]
    async fn test_recommendation_unavailable_is_display_safe() {
        let app =
            test::init_service(App::new().app_data(degraded_ctx()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/recommendation")
            .set_form([("query", "Python")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_predict_json_and_bad_arity() {
        let app =
            test::init_service(App::new().app_data(test_ctx()).configure(configure)).await;

        let features = vec![
            0.0, 0.0, 2.0, 1.0, 10.0, 78.0, 82.0, 69.0, 91.0, 85.0, 77.0, 88.0, 570.0, 81.4,
        ];
        let req = test::TestRequest::post()
            .uri("/pred")
            .set_json(json!({ "features": features }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ranked");
        assert_eq!(body["top"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::post()
            .uri("/pred")
            .set_json(json!({ "features": [1.0, 2.0] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_predict_unavailable_sentinel() {
        let app =
            test::init_service(App::new().app_data(degraded_ctx()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/pred")
            .set_json(json!({ "features": vec![0.0; FEATURE_COUNT] }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "unavailable");
    }

    #[actix_web::test]
    async fn test_signup_then_duplicate_conflict() {
        let ctx = test_ctx();
        let app = test::init_service(
            App::new().app_data(ctx.clone()).configure(configure),
        )
        .await;

        let form = [
            ("fullname", "Alice Example"),
            ("dob", "1999-04-12"),
            ("username", "alice"),
            ("email", "alice@example.com"),
            ("password", "s3cret-passphrase"),
            ("mobile", "5550100"),
        ];

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_form(form)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(ctx.users.count(), 1);

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_form(form)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        // Form state is preserved, the password is not echoed.
        assert_eq!(body["bindings"]["form"]["username"], "alice");
        assert!(body["bindings"]["form"].get("password").is_none());
        assert_eq!(ctx.users.count(), 1);
    }

    #[actix_web::test]
    async fn test_profile_not_found() {
        let app =
            test::init_service(App::new().app_data(test_ctx()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/profile/ghost").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_logout_redirects_home() {
        let app =
            test::init_service(App::new().app_data(test_ctx()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get("Location").unwrap(), "/");
    }

    #[actix_web::test]
    async fn test_dashboard_reports_availability() {
        let app =
            test::init_service(App::new().app_data(degraded_ctx()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/dashboard").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["bindings"]["classifier_available"], false);
        assert_eq!(body["bindings"]["recommender_available"], false);
    }
}
