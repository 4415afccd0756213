//! UI routes - input form and form submission
//!
//! Every outcome is a full HTML page with status 200. Validation and
//! prediction failures are shown as a message above an empty form; nothing
//! about a request outlives its response.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    response::Html,
    routing::{get, post},
    Form, Router,
};
use iris_common::{validate, Predictor};
use tracing::{error, info_span, warn};
use uuid::Uuid;

use super::render::{render_page, PageView};
use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/get_data", post(submit_measurements))
}

/// GET /
///
/// Empty measurement form
pub async fn index_page() -> Html<String> {
    Html(render_page(PageView::Form))
}

/// POST /get_data
///
/// Validates the four measurements and renders the prediction
pub async fn submit_measurements(
    State(state): State<AppState>,
    SubmittedForm(form): SubmittedForm,
) -> Html<String> {
    let request_id = Uuid::new_v4();
    let span = info_span!("get_data", %request_id);
    Html(span.in_scope(|| handle_submission(&state.predictor, &form)))
}

/// Submitted form fields, from a urlencoded or multipart body
///
/// Extraction never rejects: a body that cannot be read as a form yields an
/// empty field map, so the visitor sees the first missing-field message
/// instead of a bare 4xx.
pub struct SubmittedForm(pub HashMap<String, String>);

#[async_trait]
impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            return Ok(Self(read_multipart(req, state).await));
        }

        match Form::<HashMap<String, String>>::from_request(req, state).await {
            Ok(Form(fields)) => Ok(Self(fields)),
            Err(rejection) => {
                warn!("Unreadable form body: {}", rejection);
                Ok(Self(HashMap::new()))
            }
        }
    }
}

/// Collect text parts; the first value for a repeated name wins
async fn read_multipart<S: Send + Sync>(req: Request, state: &S) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Unreadable multipart body: {}", rejection);
            return fields;
        }
    };

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                match field.text().await {
                    Ok(value) => {
                        fields.entry(name).or_insert(value);
                    }
                    Err(e) => warn!("Skipping multipart field {}: {}", name, e),
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                break;
            }
        }
    }
    fields
}

/// Validate, predict, and render one submission
pub fn handle_submission(predictor: &Predictor, form: &HashMap<String, String>) -> String {
    let measurements = match validate(form) {
        Ok(measurements) => measurements,
        Err(e) => {
            warn!("Rejected submission: {}", e);
            return render_page(PageView::Message(&e.to_string()));
        }
    };

    match predictor.predict(&measurements) {
        Ok(result) => render_page(PageView::Result(&result)),
        Err(e) => {
            error!("Prediction failed: {}", e);
            render_page(PageView::Message(&e.user_message()))
        }
    }
}
