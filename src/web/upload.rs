use std::borrow::Cow;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::{
    api::{SelectedFile, User},
    policy::{ADMIN_HOME_PATH, USER_HOME_PATH, View},
    upload::{self, UPLOAD_FAILED_MESSAGE, UPLOAD_SUCCESS_MESSAGE, UploadError, UploadForm},
    web::{
        AppState,
        flash::{Flash, sanitize_return_to},
        guard,
        responses::upstream_status,
        templates::{NavLink, PageLayout, escape_html, render_page},
    },
};

/// Text inputs echoed back into the form after a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFormValues {
    pub title: String,
    pub description: String,
}

struct ParsedUpload {
    form: UploadForm,
    return_to: Option<String>,
}

pub async fn upload_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Redirect> {
    let (_, user) = guard::require_user(&state, jar, View::Upload)?;
    Ok(Html(render_upload_page(
        &user,
        &UploadFormValues::default(),
        None,
        &Flash::None,
    )))
}

pub async fn process_upload(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, Redirect> {
    let (store, user) = guard::require_user(&state, jar, View::Upload)?;

    let parsed = match read_upload_form(multipart).await {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(error = %err, "upload form could not be read");
            let flash = Flash::error(UPLOAD_FAILED_MESSAGE);
            let page = render_upload_page(&user, &UploadFormValues::default(), None, &flash);
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    let values = UploadFormValues {
        title: parsed.form.title.clone(),
        description: parsed.form.description.clone(),
    };
    let return_to = sanitize_return_to(parsed.return_to.as_deref());

    match upload::submit(state.api(), store.session(), parsed.form).await {
        Ok(_) => match return_to {
            Some(target) => Ok(Redirect::to(&format!("{target}?status=uploaded")).into_response()),
            None => {
                let flash = Flash::success(UPLOAD_SUCCESS_MESSAGE);
                let page = render_upload_page(&user, &UploadFormValues::default(), None, &flash);
                Ok(Html(page).into_response())
            }
        },
        Err(err) => {
            let status = match &err {
                UploadError::MissingFile => StatusCode::BAD_REQUEST,
                UploadError::Api(api_err) => {
                    warn!(error = %api_err, "certificate upload rejected");
                    upstream_status(api_err)
                }
            };
            let flash = Flash::error(err.user_message());
            let page = render_upload_page(&user, &values, return_to, &flash);
            Ok((status, Html(page)).into_response())
        }
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<ParsedUpload, String> {
    let mut form = UploadForm::default();
    let mut return_to = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| format!("failed to parse multipart body: {err}"))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|err| format!("failed to read file field: {err}"))?;
            form.file = Some(SelectedFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| format!("failed to read field `{name}`: {err}"))?;
        match name.as_str() {
            "title" => form.title = value,
            "description" => form.description = value,
            "return_to" => return_to = Some(value),
            _ => {}
        }
    }

    Ok(ParsedUpload { form, return_to })
}

/// The multipart upload form. `return_to` is echoed as a hidden field so the handler can send
/// the browser back to the embedding page.
pub fn render_upload_form(values: &UploadFormValues, return_to: Option<&str>) -> String {
    let return_to_html = return_to
        .map(|target| {
            format!(
                r#"
                <input type="hidden" name="return_to" value="{}">"#,
                escape_html(target)
            )
        })
        .unwrap_or_default();

    format!(
        r#"            <form method="post" action="/upload" enctype="multipart/form-data">{return_to_html}
                <label for="title">Title</label>
                <input id="title" type="text" name="title" value="{title}" placeholder="Certificate title">
                <label for="description">Description</label>
                <textarea id="description" name="description" rows="3" placeholder="Optional description">{description}</textarea>
                <label for="file">Certificate file</label>
                <input id="file" type="file" name="file" accept=".pdf,.png,.jpg,.jpeg">
                <div class="form-actions"><button type="submit">Upload</button></div>
            </form>"#,
        title = escape_html(&values.title),
        description = escape_html(&values.description),
    )
}

/// Full upload page. A sanitized `return_to` is kept so a failed submission from an embedded
/// form still lands back where it started.
pub fn render_upload_page(
    user: &User,
    values: &UploadFormValues,
    return_to: Option<&str>,
    flash: &Flash,
) -> String {
    let body = format!(
        r#"        <section class="panel">
            <h2>Upload Certificate</h2>
{form}
        </section>"#,
        form = render_upload_form(values, return_to),
    );

    let home = if user.role.is_admin() {
        NavLink {
            href: ADMIN_HOME_PATH,
            label: "Admin dashboard",
        }
    } else {
        NavLink {
            href: USER_HOME_PATH,
            label: "My certificates",
        }
    };

    render_page(PageLayout {
        meta_title: "Upload",
        page_heading: "Upload Certificate",
        user: Some(user),
        nav_links: vec![home],
        flash_html: Cow::Owned(flash.render()),
        body_html: Cow::Owned(body),
    })
}
