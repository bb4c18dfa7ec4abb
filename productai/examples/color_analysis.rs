//! Analyze the outfit colors of a local image.

use productai::{Client, ColorQuery, Granularity, ImageInput, ReturnType};
use productai_core::{Context, OsEnv};
use productai_file_read_tokio::TokioFileRead;
use productai_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        anyhow::bail!("usage: color_analysis <image>");
    };

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::from_env(ctx).await?.with_language(Some("zh-cn"));

    let image = ImageInput::from_file(client.context(), &path).await?;
    let resp = client
        .get_color_analysis_api("person_outfit")?
        .query(ColorQuery::new(image, Granularity::Major, ReturnType::W3c))
        .await?;
    println!("{}", resp.text());

    Ok(())
}
