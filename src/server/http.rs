//! actix-web application and JSON-RPC dispatch

use std::time::Duration;

use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use super::types::{RpcError, RpcRequest, RpcResponse};
use crate::config::Config;
use crate::envelope::ResultEnvelope;
use crate::error::{BridgeError, Result};
use crate::fetch::{fetch_document, DocumentSource};
use crate::generator::generate_tool_schemas;
use crate::parser::parse_document_value;
use crate::scaffold::{generate_scaffold, ScaffoldTarget};

/// Common document-bearing params: inline spec (text or object) or URL
#[derive(Debug, Deserialize)]
struct DocumentParams {
    #[serde(default)]
    spec: Option<Value>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScaffoldParams {
    #[serde(flatten)]
    document: DocumentParams,
    language: String,
    #[serde(default)]
    project_name: Option<String>,
}

/// Start the HTTP server and block until shutdown
pub async fn start_server(config: Config) -> std::io::Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    info!("Starting Specbridge JSON-RPC server on {}:{}", host, port);

    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            // Health check
            .route("/health", web::get().to(health_check))
            // JSON-RPC 2.0 endpoint
            .route("/rpc", web::post().to(rpc_handler))
    })
    .bind((host, port))?
    .run()
    .await
}

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// JSON-RPC 2.0 endpoint
pub async fn rpc_handler(
    body: web::Json<RpcRequest>,
    config: web::Data<Config>,
) -> HttpResponse {
    let request = body.into_inner();
    let id = request.id.clone().unwrap_or(Value::Null);

    if request.jsonrpc != "2.0" {
        return HttpResponse::Ok().json(RpcResponse::failure(
            id,
            RpcError::invalid_request("jsonrpc field must be \"2.0\""),
        ));
    }

    debug!("dispatching JSON-RPC method {}", request.method);
    let response = match request.method.as_str() {
        "ping" => RpcResponse::success(id, json!("pong")),
        "openapi/parse" => dispatch(id, request.params, &config, handle_parse).await,
        "tools/generate" => dispatch(id, request.params, &config, handle_generate).await,
        "scaffold/generate" => dispatch_scaffold(id, request.params, &config).await,
        other => RpcResponse::failure(id, RpcError::method_not_found(other)),
    };

    HttpResponse::Ok().json(response)
}

/// Deserialize document params, run a pipeline step, wrap the outcome.
async fn dispatch(
    id: Value,
    params: Option<Value>,
    config: &Config,
    handler: fn(&Value) -> Result<Value>,
) -> RpcResponse {
    let params: DocumentParams = match deserialize_params(params) {
        Ok(params) => params,
        Err(error) => return RpcResponse::failure(id, error),
    };

    match resolve_document(&params, config).await {
        Ok((doc, source)) => match handler(&doc) {
            Ok(data) => {
                let mut envelope = ResultEnvelope::new(data);
                if let Some(source) = source {
                    envelope = envelope.with_source(source);
                }
                RpcResponse::success(id, json!(envelope))
            }
            Err(e) => pipeline_failure(id, &e),
        },
        Err(e) => pipeline_failure(id, &e),
    }
}

async fn dispatch_scaffold(id: Value, params: Option<Value>, config: &Config) -> RpcResponse {
    let params: ScaffoldParams = match deserialize_params(params) {
        Ok(params) => params,
        Err(error) => return RpcResponse::failure(id, error),
    };

    let target = match ScaffoldTarget::from_str(&params.language) {
        Some(target) => target,
        None => {
            return RpcResponse::failure(
                id,
                RpcError::invalid_params(format!("unsupported language: {}", params.language)),
            )
        }
    };

    let outcome = async {
        let (doc, source) = resolve_document(&params.document, config).await?;
        let parsed = parse_document_value(&doc)?;
        let generation = generate_tool_schemas(&parsed)?;
        let files = generate_scaffold(
            &parsed,
            &generation.tools,
            target,
            params.project_name.as_deref(),
        )?;
        Ok::<_, BridgeError>((json!({ "files": files }), source))
    }
    .await;

    match outcome {
        Ok((data, source)) => {
            let mut envelope = ResultEnvelope::new(data);
            if let Some(source) = source {
                envelope = envelope.with_source(source);
            }
            RpcResponse::success(id, json!(envelope))
        }
        Err(e) => pipeline_failure(id, &e),
    }
}

fn handle_parse(doc: &Value) -> Result<Value> {
    let parsed = parse_document_value(doc)?;
    Ok(json!(parsed))
}

fn handle_generate(doc: &Value) -> Result<Value> {
    let parsed = parse_document_value(doc)?;
    let generation = generate_tool_schemas(&parsed)?;
    Ok(json!(generation))
}

fn deserialize_params<T: serde::de::DeserializeOwned>(
    params: Option<Value>,
) -> std::result::Result<T, RpcError> {
    let params = params.ok_or_else(|| RpcError::invalid_params("params object is required"))?;
    serde_json::from_value(params).map_err(|e| RpcError::invalid_params(e.to_string()))
}

async fn resolve_document(
    params: &DocumentParams,
    config: &Config,
) -> Result<(Value, Option<String>)> {
    let timeout = Duration::from_secs(config.fetch.timeout_secs);
    let source = match (&params.spec, &params.url) {
        (_, Some(url)) => DocumentSource::Url(url.clone()),
        (Some(Value::String(text)), _) => DocumentSource::Inline(text.clone()),
        (Some(doc), _) => DocumentSource::Value(doc.clone()),
        (None, None) => {
            return Err(BridgeError::invalid_input(
                "either spec or url must be provided",
            ))
        }
    };
    fetch_document(&source, timeout).await
}

fn pipeline_failure(id: Value, err: &BridgeError) -> RpcResponse {
    error!("pipeline failure: {}", err);
    RpcResponse::failure(id, err.into())
}
