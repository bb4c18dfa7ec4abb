//! Run a batch task over a CSV listing and poll it until the server reports
//! a final state.
//!
//! ```bash
//! export PRODUCTAI_ACCESS_KEY_ID=...
//! export PRODUCTAI_ACCESS_KEY_SECRET=...
//! cargo run --example batch_task -- <service_id> <images.csv>
//! ```

use productai::{Client, ImagesFile};
use productai_core::{Context, OsEnv};
use productai_file_read_tokio::TokioFileRead;
use productai_http_send_reqwest::ReqwestHttpSend;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(service_id), Some(path)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: batch_task <service_id> <images.csv>");
    };

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::from_env(ctx).await?;
    let batch = client.get_batch_api();

    let task = batch
        .prepare_by_file(&service_id, ImagesFile::Path(path))
        .await?;
    println!("prepared task {}", task.task_id);

    batch.apply(&task.task_id).await?;
    loop {
        let info = batch.get_task_info(&task.task_id).await?;
        let status = info.status_text().unwrap_or_default();
        println!("task {} is {status}", task.task_id);
        if !matches!(status.as_str(), "waiting" | "processing") {
            break;
        }
        tokio::time::sleep(Duration::from_secs(10)).await;
    }

    Ok(())
}
