//! MCP request handling.
//!
//! [`CalendarMcpServer`] answers `resources/list` and `resources/read` from a
//! [`ResourceRegistry`]. Everything else is left to the protocol defaults.

use std::sync::Arc;

use calendar_mcp_providers::CalendarGateway;
use rmcp::model::{
    AnnotateAble, Implementation, ListResourcesResult, PaginatedRequestParam, RawResource,
    ReadResourceRequestParam, ReadResourceResult, Resource as McpResource, ResourceContents,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::envelope::ResourceEnvelope;
use crate::error::{ServerError, ServerResult};
use crate::resources::ResourceRegistry;

const INSTRUCTIONS: &str = "Read-only calendar resources. Read resource://today-calendar for \
today's events or resource://weekly-calendar for the next 7 days. A body with an \"error\" \
field means the calendar could not be reached.";

/// The MCP server: a resource registry plus handshake metadata.
#[derive(Debug, Clone)]
pub struct CalendarMcpServer {
    registry: Arc<ResourceRegistry>,
    name: String,
    version: String,
}

impl CalendarMcpServer {
    pub fn new(registry: ResourceRegistry, config: &ServerConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            name: config.name.clone(),
            version: config.version.clone(),
        }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Descriptors for every registered resource, in registry order.
    pub fn resource_list(&self) -> Vec<McpResource> {
        self.registry
            .iter()
            .map(|resource| {
                let mut raw = RawResource::new(resource.uri(), resource.name());
                raw.description = Some(resource.description().to_string());
                raw.mime_type = Some(resource.mime_type().to_string());
                raw.no_annotation()
            })
            .collect()
    }

    /// Reads the resource at `uri`.
    ///
    /// # Errors
    ///
    /// `resource_not_found` if no resource is registered at `uri`. Calendar
    /// failures are not errors here; they come back as degraded contents.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let Some(envelopes) = self.registry.read(uri).await else {
            warn!(uri, "read of unknown resource");
            return Err(McpError::resource_not_found(
                format!("resource not found: {}", uri),
                Some(serde_json::json!({ "uri": uri })),
            ));
        };

        debug!(uri, count = envelopes.len(), "resource read");
        Ok(ReadResourceResult {
            contents: envelopes.into_iter().map(to_contents).collect(),
        })
    }
}

fn to_contents(envelope: ResourceEnvelope) -> ResourceContents {
    let mut contents = ResourceContents::text(envelope.text, envelope.uri);
    if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
        *mime_type = Some(envelope.mime_type);
    }
    contents
}

impl ServerHandler for CalendarMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = self.name.clone();
        server_info.version = self.version.clone();

        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_resources().build(),
            server_info,
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.resource_list()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read(&request.uri).await
    }
}

/// Builds the gateway and resources from `config` and serves MCP on stdio
/// until the client disconnects.
///
/// # Errors
///
/// Fails if the configuration is invalid or the transport cannot start.
/// Credential problems do not stop the server; they surface as degraded
/// calendar reads.
pub async fn serve_stdio(config: ServerConfig) -> ServerResult<()> {
    config.validate()?;

    let gateway = Arc::new(CalendarGateway::new(config.gateway_config())?);
    info!(
        calendar_id = gateway.calendar_id(),
        credentials = %config.credentials_path.display(),
        "starting calendar-mcp on stdio"
    );

    let server = CalendarMcpServer::new(ResourceRegistry::standard(gateway), &config);
    let service = server
        .serve(stdio())
        .await
        .map_err(|e| ServerError::transport(format!("failed to start: {}", e)))?;

    let reason = service
        .waiting()
        .await
        .map_err(|e| ServerError::transport(e.to_string()))?;
    info!(?reason, "calendar-mcp stopped");

    Ok(())
}
