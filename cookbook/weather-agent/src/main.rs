//! Walks a ReAct agent through a weather question twice: once stepped by hand
//! and once run to completion. The model is scripted so the demo runs offline.
//!
//! Pass a TOML settings file as the first argument to change the history mode
//! or round limit, e.g. `mode = "messages"`.

use std::env;
use std::sync::Arc;

use sayr_react::tools::CalculatorTool;
use sayr_react::{
    init_tracing_with_filter, AgentSettings, ReactAgent, Result, StubModel, ToolRegistry,
    TracingObserver,
};

const QUESTION: &str = "What's the temperature for my location tomorrow?";

fn script() -> Vec<&'static str> {
    vec![
        "Thought: I need to know where the user is.\nAction: get_current_city[]",
        "Thought: Now I can look up the forecast.\nAction: get_weather[Auckland]\nObservation: 20°C",
        "Thought: I now know the final answer\nFinal Answer: Tomorrow in Auckland it will be 15°C and sunny.",
    ]
}

fn weather_tools() -> ToolRegistry {
    let mut tools = ToolRegistry::new();
    tools.register_fn("get_weather", &["city"], |city| async move {
        Ok(format!(
            "Weather Forecast for {}: 15°C and sunny.",
            city.unwrap_or_default()
        ))
    });
    tools.register_fn("get_current_city", &[], |_| async {
        Ok("You are in Auckland".to_string())
    });
    tools.register(CalculatorTool);
    tools
}

fn build_agent(settings: AgentSettings, tools: ToolRegistry) -> Result<ReactAgent> {
    ReactAgent::builder()
        .model(StubModel::new(script()))
        .with_tools(tools)
        .with_settings(settings)
        .with_observer(Arc::new(TracingObserver))
        .build()
}

async fn stepped(settings: AgentSettings) -> Result<()> {
    let tools = weather_tools();
    let agent = build_agent(settings, tools.clone())?;
    let mut session = agent.start(QUESTION);

    loop {
        let step = session.step().await?;
        if let Some(outcome) = step.outcome() {
            println!("{}", serde_json::to_string_pretty(&outcome.messages).unwrap_or_default());
            break;
        }
        if let Some(directive) = step.action() {
            let observation = if tools.contains(&directive.action) {
                tools
                    .call(&directive.action, directive.action_input.clone())
                    .await?
            } else {
                format!("Invalid action: {}", directive.action)
            };
            session.observe(observation).await?;
        }
    }
    Ok(())
}

async fn run_to_completion(settings: AgentSettings) -> Result<()> {
    let agent = build_agent(settings, weather_tools())?;
    let outcome = agent.run(QUESTION).await?;
    match outcome.final_answer() {
        Some(answer) => println!("Final Answer: {answer}"),
        None => println!("stopped without an answer: {:?}", outcome.termination),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing_with_filter("sayr_react=info,weather_agent=info");

    let settings = match env::args().nth(1) {
        Some(path) => AgentSettings::from_env_or_file(path)?,
        None => AgentSettings::default().apply_env()?,
    };
    tracing::info!(mode = %settings.mode, round_limit = settings.round_limit, "starting");

    stepped(settings).await?;
    run_to_completion(settings).await
}
