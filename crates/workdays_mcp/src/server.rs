use std::sync::Arc;
use std::time::Duration;

use rmcp::{
    RoleServer, ServerHandler,
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        tool::ToolCallContext,
        wrapper::Parameters,
    },
    model::*,
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_router,
};

use crate::config::Config;
use crate::core::{
    clock::Clock,
    error::{McpError, McpResult, WorkdayServerError, WorkdayServerResult},
    models::{GetCurrentTimeRequest, GetWorkdaysRequest, Provider},
    resolver::WorkdayResolver,
    sources::JsonFetcher,
    utils::MAKEUP_WORKDAY_MARKER,
    validation::Validate,
};
use crate::utils::HttpFetcher;

/// Workdays MCP Server with clock and holiday calendar tools
#[derive(Clone)]
pub struct WorkdayService {
    clock: Clock,
    resolver: WorkdayResolver,
    config: Config,
    local_timezone_name: String, // Cache this
    tool_router: ToolRouter<WorkdayService>,
    prompt_router: PromptRouter<WorkdayService>,
}

impl WorkdayService {
    pub fn new(config: Config) -> WorkdayServerResult<Self> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn JsonFetcher>) -> Self {
        let clock = Clock::new();
        let local_timezone_name = clock.local_timezone_name();
        let resolver = WorkdayResolver::new(fetcher, config.endpoints.clone());

        Self {
            clock,
            resolver,
            config,
            local_timezone_name,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    fn create_resource_text(&self, uri: &str, name: &str) -> Resource {
        RawResource::new(uri, name.to_string()).no_annotation()
    }

    pub(crate) fn get_local_timezone_name(&self) -> &str {
        &self.local_timezone_name
    }

    fn default_timeout(&self) -> Duration {
        self.config.default_timeout
    }

    fn generate_status_content(&self) -> McpResult<String> {
        let now = self
            .clock
            .format_now(&self.local_timezone_name, "%Y-%m-%d %H:%M:%S%z")?;

        Ok(format!(
            r#"Workdays MCP Server Status

Server: Running
Local Timezone: {}
Current Local Time: {}
Default Timeout: {}ms
User Agent: {}
Tools Available: 2
Prompts Available: 1
Resources Available: 3

Providers:
- timor: {}
- nate: {} (mirror: {})"#,
            self.local_timezone_name,
            now,
            self.default_timeout().as_millis(),
            self.config.user_agent,
            self.config.endpoints.timor,
            self.config.endpoints.nate,
            self.config.endpoints.nate_mirror,
        ))
    }

    fn generate_help_content(&self) -> String {
        format!(
            r#"Workdays MCP Server Help

TOOLS:
- get_current_time: Current time in a timezone, rendered through a template
  - tz: IANA timezone name or 'local' (default: local)
  - fmt: Template (default: %Y-%m-%d %H:%M:%S%z)
  - Example: {{"tz": "Asia/Shanghai", "fmt": "%Y-%m-%d %H:%M:%S%z"}}

- get_workdays_from_api: Official workdays of a month
  - year: Year >= 1970 (default: current year in tz)
  - month: Month 1-12 (default: current month in tz)
  - tz: Timezone used for the defaults (default: local)
  - provider: 'timor' or 'nate' (default: timor)
  - timeout: Seconds (default: {:.1}, minimum 1.0)
  - Example: {{"year": 2024, "month": 2, "provider": "nate"}}

TEMPLATE TOKENS:
- %Y four digit year
- %m %d two digit month and day
- %H %M %S two digit 24-hour time
- %z UTC offset as +HH:MM

RESULT:
{{"provider": "timor", "year": 2024, "month": 2,
 "workdays": ["2024-02-01", ...], "holidays": [...],
 "makeup_workdays": [...], "errors": 0}}

PROMPTS:
- workday_guidance: How to read the workday calendar

RESOURCES:
- workdays://status: Current server status and configuration
- workdays://help: This help documentation
- workdays://providers: Holiday provider details

LOCAL TIMEZONE: {}"#,
            self.default_timeout().as_secs_f64(),
            self.local_timezone_name
        )
    }

    fn generate_provider_content(&self) -> String {
        format!(
            r#"Holiday Calendar Providers

timor (default)
- URL: {}
- Holidays: entries with "holiday": true
- Makeup workdays: entries with "holiday": false whose name contains "{}"
- No mirror

nate (NateScarlet/holiday-cn)
- URL: {}
- Mirror: {} (tried once when the primary fails)
- Holidays: entries with "isOffDay": true
- Makeup workdays: entries with "isOffDay": false falling on Saturday or Sunday

Both providers publish one document per year; every call fetches the whole
year and keeps the requested month. Nothing is cached."#,
            self.config.endpoints.timor,
            MAKEUP_WORKDAY_MARKER,
            self.config.endpoints.nate,
            self.config.endpoints.nate_mirror,
        )
    }
}

/// Render a domain failure as an error-flagged text block
fn failure_result(err: WorkdayServerError) -> CallToolResult {
    tracing::warn!(error = %err, "tool call failed");
    CallToolResult::error(vec![Content::text(err.to_string())])
}

pub(crate) fn unknown_tool_result(name: &str) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Unknown tool: {}", name))])
}

#[tool_router]
impl WorkdayService {
    #[tool(
        description = "Get the current time in a timezone ('local' or an IANA name) formatted with a template. Tokens: %Y %m %d %H %M %S %z (offset as +HH:MM)."
    )]
    pub(crate) async fn get_current_time(
        &self,
        Parameters(req): Parameters<GetCurrentTimeRequest>,
    ) -> McpResult<CallToolResult> {
        match self.clock.format_now(req.tz(), req.fmt()) {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => Ok(failure_result(e)),
        }
    }

    #[tool(
        description = "Get the official workdays, holidays and makeup workdays of a month from the timor or nate holiday calendars. Returns a JSON object as text."
    )]
    pub(crate) async fn get_workdays_from_api(
        &self,
        Parameters(req): Parameters<GetWorkdaysRequest>,
    ) -> McpResult<CallToolResult> {
        if let Err(e) = req.validate() {
            return Ok(failure_result(e));
        }

        let today = match self.clock.current_year_month(req.tz()) {
            Ok(today) => today,
            Err(e) => return Ok(failure_result(e)),
        };
        let (year, month) = req.year_month(today);
        let timeout = req.timeout_duration(self.default_timeout());

        match self
            .resolver
            .resolve(year, month, req.provider(), timeout)
            .await
        {
            Ok(result) => {
                let text = serde_json::to_string(&result)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(failure_result(e)),
        }
    }
}

#[prompt_router]
impl WorkdayService {
    /// Guidance for interpreting the monthly workday calendar
    #[prompt(name = "workday_guidance")]
    async fn workday_guidance(
        &self,
        _ctx: RequestContext<rmcp::RoleServer>,
    ) -> McpResult<Vec<PromptMessage>> {
        let providers = Provider::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let guidance = format!(
            r#"Reading the workday calendar:

1. **workdays** lists every working date of the month: weekdays that are not
   official holidays, plus makeup workdays.
2. **holidays** lists official non-working dates, including those on weekdays.
3. **makeup_workdays** lists weekend dates that were turned into working days
   to compensate for a holiday elsewhere; they also appear in workdays.
4. A plain Saturday or Sunday appears in none of the lists.
5. Dates are YYYY-MM-DD strings in ascending order.

Providers: {}. Use 'nate' if 'timor' is unavailable.
Your local timezone is detected as: {}"#,
            providers,
            self.get_local_timezone_name()
        );

        Ok(vec![PromptMessage {
            role: PromptMessageRole::Assistant,
            content: PromptMessageContent::text(guidance),
        }])
    }
}

#[prompt_handler]
impl ServerHandler for WorkdayService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Workdays MCP Server. Tools: get_current_time, get_workdays_from_api (providers: timor, nate). Local timezone: {}. Results are returned as text.",
                self.get_local_timezone_name()
            )),
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> McpResult<CallToolResult> {
        if !self.tool_router.has_route(&request.name) {
            tracing::warn!(tool = %request.name, "unknown tool requested");
            return Ok(unknown_tool_result(&request.name));
        }

        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> McpResult<ListToolsResult> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
        })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> McpResult<ListResourcesResult> {
        Ok(ListResourcesResult {
            resources: vec![
                self.create_resource_text("workdays://status", "server-status"),
                self.create_resource_text("workdays://help", "help-documentation"),
                self.create_resource_text("workdays://providers", "provider-details"),
            ],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> McpResult<ReadResourceResult> {
        let text = match uri.as_str() {
            "workdays://status" => self.generate_status_content()?,
            "workdays://help" => self.generate_help_content(),
            "workdays://providers" => self.generate_provider_content(),
            _ => {
                return Err(WorkdayServerError::ResourceNotFound {
                    uri: uri.to_string(),
                }
                .into());
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> McpResult<ListResourceTemplatesResult> {
        Ok(ListResourceTemplatesResult {
            next_cursor: None,
            resource_templates: Vec::new(),
        })
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> McpResult<InitializeResult> {
        tracing::info!("Workdays MCP Server initialized successfully");
        Ok(self.get_info())
    }
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    use rmcp::{ServiceExt, transport::stdio};

    let service = WorkdayService::new(config)?
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}
