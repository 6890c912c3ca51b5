use std::sync::Arc;

use kameleoon_openfeature::{
    data::Data, CachingClientFactory, ClientConfig, ContextValue, Error, EvaluationContext,
    KameleoonClient, KameleoonProvider, Result, SharedClient, Variable, VariableType, Variation,
};

/// Stand-in for the Kameleoon SDK client: every visitor gets the "on" variation.
struct StaticClient;

impl KameleoonClient for StaticClient {
    fn add_data(&self, visitor_code: &str, data: Vec<Data>) -> Result<()> {
        println!("Data for {visitor_code}: {data:?}");
        Ok(())
    }

    fn get_variation(&self, _visitor_code: &str, feature_key: &str) -> Result<Variation> {
        match feature_key {
            "new-checkout" => Ok(Variation::new(
                "on",
                [
                    Variable::new("enabled", VariableType::Boolean, true),
                    Variable::new("title", VariableType::String, "Express checkout"),
                ],
            )),
            _ => Err(Error::FeatureNotFound(format!(
                "Feature flag '{feature_key}' not found"
            ))),
        }
    }

    fn wait_init(&self) -> Result<bool> {
        Ok(true)
    }
}

pub fn main() {
    // Configure env_logger to see provider logs.
    env_logger::init();

    let factory = Arc::new(CachingClientFactory::new(
        |_site_code: &str, _config: Option<&ClientConfig>| {
            Ok(Arc::new(StaticClient) as SharedClient)
        },
    ));
    let mut provider = KameleoonProvider::new(
        "site-code",
        Some(ClientConfig::new("client-id", "client-secret")),
        factory,
    );

    // Until init() succeeds, every fetch returns the default value.
    provider.init();

    let context = EvaluationContext::with_targeting_key("visitor-code").with_field(
        "customData",
        ContextValue::structure([
            ("index", ContextValue::Integer(1)),
            ("values", ContextValue::from("premium")),
        ]),
    );

    let enabled = provider.fetch_boolean_value("new-checkout", false, Some(&context));
    println!("Enabled: {:?}", enabled);

    let title = provider.fetch_string_value(
        "new-checkout",
        "Checkout",
        Some(&context.clone().with_field("variableKey", "title")),
    );
    println!("Title: {:?}", title);

    let missing = provider.fetch_boolean_value("unknown-flag", false, Some(&context));
    println!("Missing: {:?}", missing);

    provider.shutdown();
}
