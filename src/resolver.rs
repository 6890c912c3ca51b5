use crate::{
    client::SharedClient, data, AllowedTypes, ContextValue, Error, ErrorCode, EvaluationContext,
    ResolutionDetails, Value, Variation,
};

/// Context attribute selecting which variable of the variation to return.
pub const VARIABLE_KEY: &str = "variableKey";

const TARGETING_KEY_MISSING_MESSAGE: &str =
    "The TargetingKey is required in context and cannot be omitted.";
pub(crate) const TYPE_MISMATCH_MESSAGE: &str =
    "The type of value received is different from the requested value.";

/// Turns a flag lookup into [`ResolutionDetails`].
pub trait Resolver {
    /// Resolve `flag_key` for `context`, accepting only values whose type is in
    /// `allowed_types`. Never fails: errors come back as details carrying `default_value`.
    fn resolve(
        &self,
        allowed_types: AllowedTypes,
        flag_key: &str,
        default_value: Value,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Value>;
}

/// [`Resolver`] backed by a Kameleoon client.
///
/// The targeting key of the context is used as the visitor code. Data records derived from the
/// context are sent to the client before the variation is requested. The returned value is the
/// variable named by the `"variableKey"` context attribute, or the first variable of the
/// variation when no key is given. Variations are expected to carry a single variable in that
/// case. A `"variableKey"` that is neither null nor a string fails the resolution with
/// [`ErrorCode::General`].
pub struct KameleoonResolver {
    client: SharedClient,
}

impl KameleoonResolver {
    #[allow(missing_docs)]
    pub fn new(client: SharedClient) -> Self {
        KameleoonResolver { client }
    }

    fn resolve_inner(
        &self,
        allowed_types: AllowedTypes,
        flag_key: &str,
        default_value: Value,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Value> {
        let Some((context, visitor_code)) = context
            .and_then(|context| Some((context, context.targeting_key()?)))
            .filter(|(_, visitor_code)| !visitor_code.is_empty())
        else {
            return ResolutionDetails::error(
                default_value,
                ErrorCode::TargetingKeyMissing,
                TARGETING_KEY_MISSING_MESSAGE,
                None,
            );
        };

        let variation = match self.fetch_variation(visitor_code, flag_key, context) {
            Ok(variation) => variation,
            Err(err) => {
                return ResolutionDetails::error(
                    default_value,
                    error_code(&err),
                    err.to_string(),
                    None,
                )
            }
        };

        let variable_key = match get_variable_key(context, &variation) {
            Ok(variable_key) => variable_key,
            Err(message) => {
                log::warn!(target: "kameleoon",
                           flag_key,
                           visitor_code,
                           variant:display = variation.key;
                           "{message}");
                return ResolutionDetails::error(
                    default_value,
                    ErrorCode::General,
                    message,
                    Some(variation.key.clone()),
                );
            }
        };
        let value = variable_key
            .and_then(|key| variation.variables.get(key))
            .and_then(|variable| variable.value.as_ref());

        let (Some(variable_key), Some(value)) = (variable_key, value) else {
            return ResolutionDetails::error(
                default_value,
                ErrorCode::FlagNotFound,
                make_error_description(&variation.key, variable_key),
                Some(variation.key),
            );
        };

        if allowed_types.allows(value) {
            ResolutionDetails::resolved(value.clone(), variation.key)
        } else {
            log::warn!(target: "kameleoon",
                       flag_key,
                       visitor_code,
                       variable_key,
                       variant:display = variation.key;
                       "resolved value has type {:?}, expected one of {:?}",
                       value.value_type(),
                       allowed_types.types());
            ResolutionDetails::error(
                default_value,
                ErrorCode::TypeMismatch,
                TYPE_MISMATCH_MESSAGE,
                Some(variation.key),
            )
        }
    }

    fn fetch_variation(
        &self,
        visitor_code: &str,
        flag_key: &str,
        context: &EvaluationContext,
    ) -> crate::Result<Variation> {
        self.client
            .add_data(visitor_code, data::to_kameleoon(Some(context)))?;
        self.client.get_variation(visitor_code, flag_key)
    }
}

impl Resolver for KameleoonResolver {
    fn resolve(
        &self,
        allowed_types: AllowedTypes,
        flag_key: &str,
        default_value: Value,
        context: Option<&EvaluationContext>,
    ) -> ResolutionDetails<Value> {
        let details = self.resolve_inner(allowed_types, flag_key, default_value, context);

        match details.error_code() {
            None => {
                log::trace!(target: "kameleoon",
                            flag_key,
                            variant = details.variant(),
                            value:serde = details.value();
                            "resolved a flag");
            }
            Some(code) => {
                log::debug!(target: "kameleoon",
                            flag_key,
                            error_code:display = code,
                            variant = details.variant();
                            "returning default value: {}",
                            details.error_message().unwrap_or_default());
            }
        }

        details
    }
}

fn error_code(err: &Error) -> ErrorCode {
    match err {
        Error::FeatureNotFound(_) | Error::FeatureEnvironmentDisabled(_) => {
            ErrorCode::FlagNotFound
        }
        Error::VisitorCodeInvalid(_) => ErrorCode::InvalidContext,
        Error::SiteCodeIsEmpty
        | Error::ConfigParseError(_)
        | Error::Io(_)
        | Error::Sdk(_) => ErrorCode::General,
    }
}

/// Variable key from the context, falling back to the first variable of the variation.
///
/// Fails if the context attribute is set to something other than a string.
fn get_variable_key<'a>(
    context: &'a EvaluationContext,
    variation: &'a Variation,
) -> Result<Option<&'a str>, String> {
    match context.field(VARIABLE_KEY) {
        Some(ContextValue::String(key)) if !key.is_empty() => return Ok(Some(key.as_str())),
        None | Some(ContextValue::Null) | Some(ContextValue::String(_)) => {}
        Some(other) => {
            return Err(format!(
                "The context attribute '{VARIABLE_KEY}' must be a string, got {other:?}"
            ))
        }
    }
    Ok(variation.first_variable_key().filter(|key| !key.is_empty()))
}

fn make_error_description(variant: &str, variable_key: Option<&str>) -> String {
    match variable_key {
        None => format!("The variation '{variant}' has no variables"),
        Some(variable_key) => format!(
            "The value for provided variable key '{variable_key}' isn't found in variation '{variant}'"
        ),
    }
}
