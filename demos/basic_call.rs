//! GET and POST calls against a public test API.
//!
//! Run with: `cargo run --example basic_call`

use restline::{args, CaptureBox, Client, Error, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[derive(Serialize)]
struct CommentFilter {
    #[serde(rename = "postId")]
    post_id: u32,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("restline=debug,basic_call=info")
        .init();

    let client = Client::builder()
        .base_url("https://jsonplaceholder.typicode.com/")?
        .timeout(Duration::from_secs(10))
        .retry_policy(RetryPolicy::from_secs(&[0.5, 2.0])?)
        .on_completed(|state| {
            println!(
                "-> {} {} attempt {} finished after {:?}",
                state.method, state.url, state.attempt, state.elapsed
            );
        })
        .build()?;

    println!("=== GET ===");
    let capture = CaptureBox::new();
    let response = client.get::<Post>("posts/{0}", args![1, &capture]).await?;
    if let Some(post) = &response.data {
        println!("Post {}: {}", post.id, post.title);
    }
    println!("Content-Type: {:?}", capture.header("content-type"));
    println!();

    println!("=== GET with query ===");
    let query = client.build_query(&CommentFilter { post_id: 1 })?;
    let comments = client
        .get::<Vec<serde_json::Value>>(&format!("comments?{query}"), args![])
        .await?;
    println!("{} comments", comments.data.map_or(0, |c| c.len()));
    println!();

    println!("=== POST ===");
    let new_post = NewPost {
        title: "Shipping update".to_string(),
        body: "Pallets left the warehouse.".to_string(),
        user_id: 1,
    };
    let response = client
        .post::<_, Post>("posts", &new_post, args![("X-Correlation-Id", "demo-1")])
        .await?;
    if let Some(post) = &response.data {
        println!("Created post {}", post.id);
    }
    println!("Latency: {:?}, retried: {}", response.latency, response.was_retried());

    Ok(())
}
