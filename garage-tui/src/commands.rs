//! Application commands behind the table callbacks: export, bulk delete and
//! add-form submission.

use crate::error::TuiResult;
use crate::events::TuiEvent;
use crate::notifications::Notification;
use crate::table::{FormValues, SubmitCallback, TableConfig};
use chrono::Utc;
use futures_util::FutureExt;
use garage_client::DataClient;
use garage_core::report::{Document, DocumentFormat};
use garage_core::Resource;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Everything a page needs to talk to the rest of the application.
#[derive(Clone)]
pub struct PageContext {
    pub client: DataClient,
    pub events: mpsc::UnboundedSender<TuiEvent>,
    pub export_dir: PathBuf,
    pub format: DocumentFormat,
    pub page_size: usize,
}

impl PageContext {
    pub fn notify(&self, notification: Notification) {
        let _ = self.events.send(TuiEvent::Notify(notification));
    }

    /// Write a document description for the external renderer.
    pub fn write_document(&self, stem: &str, document: &Document) {
        match export_json(&self.export_dir, stem, document) {
            Ok(path) => {
                tracing::info!(path = %path.display(), title = %document.title, "Document written");
                self.notify(Notification::success(format!(
                    "{} written to {}",
                    document.title,
                    path.display()
                )));
            }
            Err(err) => {
                tracing::warn!(error = %err, "Document write failed");
                self.notify(Notification::error(format!("Document failed: {}", err)));
            }
        }
    }
}

/// Serialize `value` as pretty JSON into `dir/<stem>-<timestamp>.json`.
pub fn export_json<T: Serialize + ?Sized>(dir: &Path, stem: &str, value: &T) -> TuiResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let stamp = Utc::now().format("%Y%m%d-%H%M%S%3f");
    let path = dir.join(format!("{}-{}.json", stem, stamp));
    let contents = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, contents)?;
    Ok(path)
}

fn export_rows<R: Resource + Serialize>(ctx: &PageContext, stem: &str, rows: &[R]) {
    match export_json(&ctx.export_dir, stem, rows) {
        Ok(path) => {
            tracing::info!(rows = rows.len(), path = %path.display(), "Rows exported");
            ctx.notify(Notification::success(format!(
                "Exported {} row(s) to {}",
                rows.len(),
                path.display()
            )));
        }
        Err(err) => {
            tracing::warn!(error = %err, "Export failed");
            ctx.notify(Notification::error(format!("Export failed: {}", err)));
        }
    }
}

/// Delete each record, then invalidate the list once if anything went.
pub async fn delete_records(client: &DataClient, endpoint: &str, ids: &[String]) -> (usize, Vec<String>) {
    let mutation = client.delete(endpoint);
    let mut deleted = 0;
    let mut failures = Vec::new();
    for id in ids {
        match mutation.submit(id, None).await {
            Ok(_) => deleted += 1,
            Err(err) => failures.push(format!("{}: {}", id, err.user_message())),
        }
    }
    if deleted > 0 {
        client.cache().invalidate_endpoint(endpoint);
    }
    (deleted, failures)
}

/// Wire export and delete callbacks for resource `R`.
pub fn bulk_actions<R: Resource + Serialize>(
    config: TableConfig<R>,
    ctx: &PageContext,
) -> TableConfig<R> {
    let stem = R::KIND.collection();
    let export_ctx = ctx.clone();
    let export_all_ctx = ctx.clone();
    let delete_ctx = ctx.clone();

    config
        .on_export_selected(Box::new(move |rows: &[R]| {
            export_rows(&export_ctx, &format!("{}-selected", stem), rows)
        }))
        .on_export_all(Box::new(move |rows: &[R]| {
            export_rows(&export_all_ctx, stem, rows)
        }))
        .on_delete_selected(Box::new(move |rows: &[R]| {
            let ids: Vec<String> = rows.iter().map(|r| r.id().clone()).collect();
            let ctx = delete_ctx.clone();
            tokio::spawn(async move {
                let (deleted, failures) =
                    delete_records(&ctx.client, R::KIND.endpoint(), &ids).await;
                if deleted > 0 {
                    ctx.notify(Notification::success(format!(
                        "Deleted {} {}",
                        deleted,
                        R::KIND.collection()
                    )));
                }
                if !failures.is_empty() {
                    ctx.notify(Notification::error(format!(
                        "Delete failed for {}",
                        failures.join("; ")
                    )));
                }
            });
        }))
}

/// Submit callback that builds a create payload from the form values and
/// posts it, revalidating the list of `R`.
///
/// A `build` error is a client-side validation failure: nothing is sent.
pub fn add_submit<R, P, F>(ctx: &PageContext, build: F) -> SubmitCallback
where
    R: Resource,
    P: Serialize + Send + Sync + 'static,
    F: Fn(&FormValues) -> Result<P, String> + Send + Sync + 'static,
{
    let ctx = ctx.clone();
    Box::new(move |values: FormValues| {
        let ctx = ctx.clone();
        let payload = build(&values);
        async move {
            let payload = payload?;
            ctx.client
                .create(R::KIND.endpoint())
                .revalidate(DataClient::list_key::<R>())
                .submit(&payload)
                .await
                .map_err(|e| e.user_message())?;
            ctx.notify(Notification::success(format!(
                "{} record added",
                R::KIND.label()
            )));
            Ok(())
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_json(dir.path(), "services", &vec![1, 2, 3]).unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("services-"));
        let contents = std::fs::read_to_string(path).unwrap();
        let values: Vec<i32> = serde_json::from_str(&contents).unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
