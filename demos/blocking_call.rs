//! Blocking calls from plain synchronous code.
//!
//! Run with: `cargo run --example blocking_call`

use restline::blocking::BlockingClient;
use restline::{args, Client, Error};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Todo {
    id: u32,
    title: String,
    completed: bool,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("restline=info")
        .init();

    let client = BlockingClient::new(
        Client::builder()
            .base_url("https://jsonplaceholder.typicode.com")?
            .build()?,
    );

    let todo = client.get::<Todo>("todos/{0}", args![3])?;
    println!("{:?}", todo.data);

    let status = client.delete("todos/{0}", args![3])?;
    println!("DELETE returned {}", status);

    match client.get::<Todo>("todos/{0}", args!["no such id"]) {
        Ok(response) => println!("Unexpected success: {:?}", response.data),
        Err(Error::Remote { status, .. }) => println!("Remote error {}", status),
        Err(e) => println!("Other error: {}", e),
    }

    Ok(())
}
