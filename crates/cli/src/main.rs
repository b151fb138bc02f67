//! Invoker demo entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration**: read the optional `--config` JSON document into
//!    a [`GrpcInvokerConfig`].
//! 2. **Wire observability**: configure `tracing-subscriber` with an
//!    `EnvFilter` (`RUST_LOG`, default `info`) and, with `--json-logs`, a JSON
//!    formatter. Logs go to stderr so stdout carries only the result.
//! 3. **Construct infrastructure**: build a [`LoopbackConnection`] and a
//!    demo [`ServiceStub`] (`Echo`, `Concat`, `Fail`), bind them into a
//!    [`GrpcInvoker`].
//! 4. **Invoke once**: run the method named on the command line, print the
//!    normalized result as JSON, then destroy the invoker. A failed call
//!    exits non-zero.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use grpc::{Client, GrpcInvoker, GrpcInvokerConfig, LoopbackConnection, ServiceStub};
use protocol::{Invoker, MethodName, RemoteError, Reply, RpcInvocation, ServicePath, Url};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "invoke-demo")]
#[command(about = "Invoke a method on an in-process demo service and print the result")]
struct Args {
    /// JSON invoker configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,

    /// Send the invocation without a reply container.
    #[arg(long)]
    no_reply: bool,

    /// Attachment as `key=value`; repeatable.
    #[arg(long = "attach", value_parser = parse_attachment)]
    attachments: Vec<(String, String)>,

    /// Method to call (`Echo`, `Concat`, `Fail`).
    method: String,

    /// Arguments, each a JSON value. Bare words are taken as strings.
    args: Vec<String>,
}

fn parse_attachment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

fn parse_argument(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GrpcInvokerConfig> {
    let Some(path) = path else {
        return Ok(GrpcInvokerConfig::default());
    };
    let document = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    GrpcInvokerConfig::from_json(&document)
        .with_context(|| format!("parsing config {}", path.display()))
}

fn method(name: &str) -> anyhow::Result<MethodName> {
    MethodName::new(name).context("method names must not be empty")
}

fn demo_stub() -> anyhow::Result<ServiceStub> {
    Ok(ServiceStub::new()
        .with_method(method("Echo")?, |_ctx, args| {
            Ok(args.first().cloned().unwrap_or(Value::Null))
        })
        .with_method(method("Concat")?, |ctx, args| {
            let sep = ctx.attachment("separator").unwrap_or(" ");
            let parts: Vec<String> = args
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            Ok(Value::String(parts.join(sep)))
        })
        .with_method(method("Fail")?, |ctx, args| {
            let reason = args.first().and_then(Value::as_str).unwrap_or("requested failure");
            let message = format!("{} rejected call: {reason}", ctx.url());
            let err: RemoteError = Arc::new(std::io::Error::other(message));
            Err(err)
        }))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = load_config(args.config.as_ref())?;
    tracing::debug!(?config, "Loaded invoker configuration");

    let url = Url::new("grpc", "127.0.0.1", 20000)
        .with_path(ServicePath::new("demo.Demo").context("service path must not be empty")?);
    let client = Client::new(Arc::new(LoopbackConnection::new()), demo_stub()?);
    let invoker = GrpcInvoker::new(url, client).with_config(config);

    let arguments = args.args.iter().map(String::as_str).map(parse_argument).collect();
    let mut reply = Reply::<Value>::new();
    let mut invocation = RpcInvocation::new(args.method.clone(), arguments);
    for (key, value) in &args.attachments {
        invocation = invocation.with_attachment(key.clone(), value.clone());
    }
    if !args.no_reply {
        invocation = invocation.with_reply(&mut reply);
    }

    let result = invoker.invoke(&mut invocation);
    drop(invocation);

    let attachments: BTreeMap<_, _> = result.attachments().iter().collect();
    let report = json!({
        "endpoint": invoker.url().to_string(),
        "method": args.method,
        "ok": result.is_ok(),
        "rest": result.rest(),
        "reply": reply.get(),
        "error": result.error().map(ToString::to_string),
        "attachments": attachments,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    invoker.destroy();
    tracing::debug!(
        available = invoker.is_available(),
        destroyed = invoker.is_destroyed(),
        "Invoker lifecycle after destroy"
    );

    result.into_result().context("invocation failed")?;
    Ok(())
}
