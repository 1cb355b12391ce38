use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tube_queue_client::{Queue, TaskOptions};
use tube_queue_transport::mock::MockTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Replies a real server would send for put, take and ack
    let transport = Arc::new(
        MockTransport::new()
            .with_reply(vec![json!([0, "r", {"image": "cat.png"}])])
            .with_reply(vec![json!([0, "t", {"image": "cat.png"}])])
            .with_reply(vec![json!([0, "-", {"image": "cat.png"}])]),
    );

    let queue = Queue::new(transport.clone(), "thumbnails")?;

    println!("Putting task...");
    let task = queue
        .put(json!({"image": "cat.png"}), TaskOptions::new().ttr(60.0))
        .await?;
    println!("Task {} queued with status {}", task.id(), task.status());

    println!("Taking task...");
    match queue.take(Some(5.0)).await? {
        Some(task) => {
            println!("Processing {}", task.data());
            let done = queue.ack(task.id()).await?;
            println!("Task {} acknowledged (done: {})", done.id(), done.is_done());
        }
        None => println!("No task available"),
    }

    for call in transport.calls() {
        println!("{} {:?}", call.method, call.args);
    }

    Ok(())
}
