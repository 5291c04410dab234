//! Remote record commands: list, show and submit.

use anyhow::{Context, anyhow};
use reqwest::multipart::Form;
use serde_json::Value;
use sehha_api_models::{Resource, SubmissionForm, extract_records};
use sehha_i18n::{LocaleCode, current_locale, prepare_for_edit, project};
use tracing::{debug, info};

use crate::cli::{ListArgs, OutputFormat, ShowArgs, SubmitArgs};
use crate::client::{AppContext, CliError, CliResult, LANG_QUERY_PARAM, classify_problem};
use crate::output::{render_record, render_records};

pub(crate) async fn handle_list(
    ctx: &AppContext,
    args: &ListArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let locale = current_locale();
    let records = fetch_records(ctx, args.resource, None, locale).await?;
    let display: Vec<Value> = if args.raw {
        records
    } else {
        records
            .iter()
            .filter_map(|record| {
                project(Some(record), Resource::TRANSLATABLE_FIELDS, locale)
            })
            .collect()
    };
    render_records(&display, format)
}

pub(crate) async fn handle_show(
    ctx: &AppContext,
    args: &ShowArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let locale = current_locale();
    let resource = args.resource;
    let record = fetch_records(ctx, resource, Some(&args.id), locale)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CliError::validation(format!("{resource} record {} not found", args.id)))?;

    let display = if args.edit {
        prepare_for_edit(
            Some(&record),
            Resource::TRANSLATABLE_FIELDS,
            resource.list_fields(),
        )
    } else if args.raw {
        Some(record)
    } else {
        project(Some(&record), Resource::TRANSLATABLE_FIELDS, locale)
    };
    render_record(&display.unwrap_or(Value::Null), format)
}

pub(crate) async fn handle_submit(
    ctx: &AppContext,
    args: &SubmitArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let locale = current_locale();
    let resource = args.resource;
    let payload = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))
        .map_err(CliError::failure)?;
    let record: Value = serde_json::from_str(&payload)
        .map_err(|err| CliError::validation(format!("record file is not valid JSON: {err}")))?;
    if !record.is_object() {
        return Err(CliError::validation("record file must hold a JSON object"));
    }

    let form = SubmissionForm::from_record(resource, &record);
    if form.is_empty() {
        return Err(CliError::validation("record has no fields to submit"));
    }

    let (path, builder) = match &args.id {
        Some(id) => {
            let path = resource.record_path(id);
            let builder = ctx.client.put(ctx.endpoint(&path)?);
            (path, builder)
        }
        None => {
            let path = resource.collection_path();
            let builder = ctx.client.post(ctx.endpoint(&path)?);
            (path, builder)
        }
    };
    info!(
        resource = %resource,
        path = %path,
        parts = form.parts().len(),
        "submitting record"
    );

    let response = ctx
        .decorate(builder, locale)?
        .multipart(multipart_form(&form))
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("request to {path} failed: {err}")))?;
    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }

    let body = response.json::<Value>().await.unwrap_or_else(|err| {
        debug!(error = %err, "submission response carried no JSON body");
        Value::Null
    });
    let Some(saved) = extract_records(&body).into_iter().next() else {
        println!("{resource} record saved.");
        return Ok(());
    };
    let projected = project(Some(&saved), Resource::TRANSLATABLE_FIELDS, locale);
    render_record(&projected.unwrap_or(Value::Null), format)
}

/// GET a collection (or one record) with the locale hint attached.
pub(crate) async fn fetch_records(
    ctx: &AppContext,
    resource: Resource,
    id: Option<&str>,
    locale: LocaleCode,
) -> CliResult<Vec<Value>> {
    let path = id.map_or_else(|| resource.collection_path(), |id| resource.record_path(id));
    let url = ctx.endpoint(&path)?;
    let request = ctx.decorate(
        ctx.client
            .get(url)
            .query(&[(LANG_QUERY_PARAM, locale.code())]),
        locale,
    )?;
    info!(resource = %resource, path = %path, locale = %locale, "fetching records");

    let response = request
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("request to {path} failed: {err}")))?;
    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }
    let body = response
        .json::<Value>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse {path} response: {err}")))?;
    Ok(extract_records(&body))
}

fn multipart_form(form: &SubmissionForm) -> Form {
    form.parts().iter().fold(Form::new(), |multipart, part| {
        multipart.text(part.name.clone(), part.value.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;
    use serial_test::serial;

    use crate::client::build_client;

    fn context_with(server: &MockServer, token: Option<&str>) -> Result<AppContext> {
        Ok(AppContext {
            client: build_client(5, "req-test").map_err(|err| anyhow!(err.display_message()))?,
            base_url: server
                .base_url()
                .parse()
                .map_err(|_| anyhow!("valid URL"))?,
            token: token.map(str::to_string),
        })
    }

    fn into_anyhow(err: CliError) -> anyhow::Error {
        anyhow!(err.display_message())
    }

    #[tokio::test]
    async fn fetch_sends_locale_hints_and_unwraps_envelope() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/doctors")
                .query_param("lang", "ar")
                .header("authorization", "Bearer secret")
                .header("accept-language", "ar");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"data": [
                    {"id": 1, "name": {"en": "Dr. Salem", "ar": "د. سالم"}},
                    {"id": 2, "name": "Dr. Huda"}
                ]}));
        });

        let ctx = context_with(&server, Some("secret"))?;
        let records = fetch_records(&ctx, Resource::Doctors, None, LocaleCode::Ar)
            .await
            .map_err(into_anyhow)?;
        mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"]["ar"], json!("د. سالم"));
        Ok(())
    }

    #[tokio::test]
    async fn fetch_requires_token_before_calling_backend() -> Result<()> {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server, None)?;
        let result = fetch_records(&ctx, Resource::Offers, None, LocaleCode::En).await;
        assert!(matches!(result, Err(CliError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn show_fetches_single_record() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/branches/7")
                .query_param("lang", "en");
            then.status(200).json_body(json!({"data": {
                "id": 7,
                "name": {"en": "Main Branch", "ar": "الفرع الرئيسي"},
                "address": ["R", "i", "y", "a", "d", "h"]
            }}));
        });

        let previous = sehha_i18n::set_current_locale(LocaleCode::En);
        let ctx = context_with(&server, Some("secret"))?;
        let args = ShowArgs {
            resource: Resource::Branches,
            id: "7".to_string(),
            raw: false,
            edit: false,
        };
        let result = handle_show(&ctx, &args, OutputFormat::Json).await;
        sehha_i18n::set_current_locale(previous);
        result.map_err(into_anyhow)?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn list_reports_backend_failures() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/galleries");
            then.status(503).body("maintenance");
        });

        let ctx = context_with(&server, Some("secret"))?;
        let args = ListArgs {
            resource: Resource::Galleries,
            raw: false,
        };
        let error = handle_list(&ctx, &args, OutputFormat::Table)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected failure"))?;
        assert_eq!(error.exit_code(), 3);
        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn submit_creates_with_multipart_post() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/excellence-centers")
                .header("authorization", "Bearer secret");
            then.status(201).json_body(json!({"data": {
                "id": 11,
                "name": {"en": "Heart Center", "ar": "مركز القلب"}
            }}));
        });

        let dir = tempfile::tempdir()?;
        let file = dir.path().join("center.json");
        std::fs::write(
            &file,
            json!({
                "name": {"en": "Heart Center", "ar": "مركز القلب"},
                "service_list": {"en": [{"title": "ECG"}]}
            })
            .to_string(),
        )?;

        let ctx = context_with(&server, Some("secret"))?;
        let args = SubmitArgs {
            resource: Resource::ExcellenceCenters,
            file,
            id: None,
        };
        handle_submit(&ctx, &args, OutputFormat::Table)
            .await
            .map_err(into_anyhow)?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn submit_updates_with_put_and_surfaces_validation() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/api/offers/3");
            then.status(422).json_body(json!({
                "message": "The given data was invalid.",
                "errors": {"title": ["The title field is required."]}
            }));
        });

        let dir = tempfile::tempdir()?;
        let file = dir.path().join("offer.json");
        std::fs::write(&file, r#"{"title": "", "price": 100}"#)?;

        let ctx = context_with(&server, Some("secret"))?;
        let args = SubmitArgs {
            resource: Resource::Offers,
            file,
            id: Some("3".to_string()),
        };
        let result = handle_submit(&ctx, &args, OutputFormat::Table).await;
        mock.assert();
        assert!(matches!(result, Err(CliError::Validation(message)) if message.contains("title")));
        Ok(())
    }

    #[tokio::test]
    async fn submit_rejects_non_object_files() -> Result<()> {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("list.json");
        std::fs::write(&file, "[1, 2]")?;

        let ctx = context_with(&server, Some("secret"))?;
        let args = SubmitArgs {
            resource: Resource::Offers,
            file,
            id: None,
        };
        assert!(matches!(
            handle_submit(&ctx, &args, OutputFormat::Table).await,
            Err(CliError::Validation(_))
        ));
        Ok(())
    }

    #[test]
    fn multipart_form_uses_every_part() {
        let mut form = SubmissionForm::new();
        form.push("title", r#"{"en":"A","ar":""}"#);
        form.push("price", "10");
        let multipart = multipart_form(&form);
        assert!(!multipart.boundary().is_empty());
    }
}
