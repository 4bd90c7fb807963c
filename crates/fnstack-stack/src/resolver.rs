//! Merging of provider defaults, stack entries, and CLI flags into one
//! [`ResolvedFunctionSpec`] per function.
//!
//! Precedence is function-level, then provider-level, then global
//! defaults. Every required field is checked before any spec is returned,
//! so a missing field aborts the invocation before work starts.

use fnstack_common::config::Invocation;
use fnstack_common::constants::{DEFAULT_GATEWAY, DEFAULT_NETWORK};
use fnstack_common::error::{FnstackError, Result};
use fnstack_common::types::{Operation, ResolvedFunctionSpec};

use crate::definition::{FunctionDefinition, Provider, StackDefinition};
use crate::env::parse_env;

const FLAGS_LABEL: &str = "<flags>";

/// Resolves the full function set for an invocation.
///
/// With a stack, one spec is produced per function in lexicographic
/// order. Without one, a single spec is built from the CLI flags.
///
/// # Errors
///
/// Returns [`FnstackError::Usage`] for push without a stack or a stack
/// with no functions, [`FnstackError::MissingField`] when a field required
/// by the operation is absent, and [`FnstackError::InvalidEnvVar`] for a
/// malformed `--env` token.
pub fn resolve(
    invocation: &Invocation,
    stack: Option<&StackDefinition>,
) -> Result<Vec<ResolvedFunctionSpec>> {
    match stack {
        Some(stack) => resolve_stack(stack, invocation),
        None => resolve_flags(invocation).map(|spec| vec![spec]),
    }
}

/// Resolves every function of a stack.
///
/// # Errors
///
/// Returns an error if the stack declares no functions or any function
/// lacks a field the operation requires.
pub fn resolve_stack(
    stack: &StackDefinition,
    invocation: &Invocation,
) -> Result<Vec<ResolvedFunctionSpec>> {
    if stack.functions.is_empty() {
        return Err(FnstackError::usage(format!(
            "{} requires at least one function in the stack file",
            invocation.operation
        )));
    }
    warn_ignored_flags(invocation);

    stack
        .functions
        .iter()
        .map(|(name, definition)| resolve_function(name, definition, &stack.provider, invocation))
        .collect()
}

/// Resolves one stack entry against its provider and the CLI defaults.
///
/// The stack key always names the function; an embedded `name` field is
/// ignored.
///
/// # Errors
///
/// Returns [`FnstackError::MissingField`] if the key is blank or a field
/// required by the operation is absent.
pub fn resolve_function(
    key: &str,
    definition: &FunctionDefinition,
    provider: &Provider,
    invocation: &Invocation,
) -> Result<ResolvedFunctionSpec> {
    require(non_empty(Some(key)), "name", invocation.operation, key)?;
    if let Some(embedded) = non_empty(definition.name.as_deref()).filter(|n| *n != key) {
        tracing::debug!(key, embedded, "ignoring embedded function name");
    }

    let image = non_empty(definition.image.as_deref());
    let handler = non_empty(definition.handler.as_deref());
    match invocation.operation {
        Operation::Build if !definition.skip_build => {
            require(image, "image", Operation::Build, key)?;
            require(handler, "handler", Operation::Build, key)?;
        }
        Operation::Deploy | Operation::Push => {
            require(image, "image", invocation.operation, key)?;
        }
        Operation::Build | Operation::Delete => {}
    }

    let network = non_empty(definition.network.as_deref())
        .or_else(|| non_empty(provider.network.as_deref()))
        .unwrap_or(DEFAULT_NETWORK);
    let gateway_url = non_empty(provider.gateway.as_deref())
        .or_else(|| non_empty(invocation.gateway.as_deref()))
        .unwrap_or(DEFAULT_GATEWAY);
    let language =
        non_empty(definition.lang.as_deref()).unwrap_or(invocation.flags.language.as_str());

    Ok(ResolvedFunctionSpec {
        name: key.to_string(),
        image: image.unwrap_or_default().to_string(),
        handler: handler.unwrap_or_default().to_string(),
        language: language.to_string(),
        fprocess: non_empty(definition.fprocess.as_deref()).map(str::to_string),
        environment: definition.environment.clone(),
        network: network.to_string(),
        gateway_url: gateway_url.to_string(),
        replace: invocation.replace,
        skip_build: definition.skip_build,
    })
}

/// Builds the single spec described by the CLI flags.
///
/// # Errors
///
/// Returns [`FnstackError::Usage`] for push, [`FnstackError::MissingField`]
/// when a required flag is absent, or [`FnstackError::InvalidEnvVar`].
pub fn resolve_flags(invocation: &Invocation) -> Result<ResolvedFunctionSpec> {
    let flags = &invocation.flags;
    let name = non_empty(flags.name.as_deref());
    let image = non_empty(flags.image.as_deref());
    let handler = non_empty(flags.handler.as_deref());

    match invocation.operation {
        Operation::Build => {
            require(image, "image", Operation::Build, FLAGS_LABEL)?;
            require(handler, "handler", Operation::Build, FLAGS_LABEL)?;
            require(name, "name", Operation::Build, FLAGS_LABEL)?;
        }
        Operation::Deploy => {
            require(image, "image", Operation::Deploy, FLAGS_LABEL)?;
            require(name, "name", Operation::Deploy, FLAGS_LABEL)?;
        }
        Operation::Delete => {
            require(name, "name", Operation::Delete, FLAGS_LABEL)?;
        }
        Operation::Push => {
            return Err(FnstackError::usage(
                "push is only supported with a stack file (-f); it cannot be driven by flags",
            ));
        }
    }

    let environment = parse_env(&flags.env)?;

    Ok(ResolvedFunctionSpec {
        name: name.unwrap_or_default().to_string(),
        image: image.unwrap_or_default().to_string(),
        handler: handler.unwrap_or_default().to_string(),
        language: flags.language.clone(),
        fprocess: non_empty(flags.fprocess.as_deref()).map(str::to_string),
        environment,
        network: DEFAULT_NETWORK.to_string(),
        gateway_url: non_empty(invocation.gateway.as_deref())
            .unwrap_or(DEFAULT_GATEWAY)
            .to_string(),
        replace: invocation.replace,
        skip_build: false,
    })
}

fn require(
    value: Option<&str>,
    field: &'static str,
    operation: Operation,
    function: &str,
) -> Result<()> {
    if value.is_some() {
        return Ok(());
    }
    Err(FnstackError::MissingField {
        field,
        operation: operation.as_str(),
        function: function.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn warn_ignored_flags(invocation: &Invocation) {
    let flags = &invocation.flags;
    let set = [
        ("--name", flags.name.is_some()),
        ("--image", flags.image.is_some()),
        ("--handler", flags.handler.is_some()),
        ("--fprocess", flags.fprocess.is_some()),
        ("--env", !flags.env.is_empty()),
    ];
    for (flag, present) in set {
        if present {
            tracing::warn!(flag, "flag ignored because a stack file was given");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn definition(image: &str, handler: &str) -> FunctionDefinition {
        FunctionDefinition {
            image: Some(image.into()),
            handler: Some(handler.into()),
            lang: Some("python".into()),
            ..FunctionDefinition::default()
        }
    }

    fn stack_of(names: &[&str]) -> StackDefinition {
        let mut functions = BTreeMap::new();
        for name in names {
            let _ = functions.insert(
                (*name).to_string(),
                definition(&format!("example/{name}"), &format!("./{name}")),
            );
        }
        StackDefinition {
            provider: Provider::default(),
            functions,
        }
    }

    #[test]
    fn blank_stack_key_is_missing_name() {
        for key in ["", "   "] {
            let mut functions = BTreeMap::new();
            let _ = functions.insert(key.to_string(), FunctionDefinition::default());
            let stack = StackDefinition {
                provider: Provider::default(),
                functions,
            };
            let err = resolve_stack(&stack, &Invocation::new(Operation::Delete))
                .expect_err("blank key must not resolve");
            assert!(matches!(
                err,
                FnstackError::MissingField { field: "name", operation: "delete", .. }
            ));
        }
    }

    #[test]
    fn network_defaults_when_provider_and_function_unset() {
        let stack = stack_of(&["a", "b", "c"]);
        let specs = resolve_stack(&stack, &Invocation::new(Operation::Deploy)).expect("resolve");
        assert_eq!(specs.len(), 3);
        assert!(specs.iter().all(|s| s.network == DEFAULT_NETWORK));
    }

    #[test]
    fn function_network_overrides_provider() {
        let mut stack = stack_of(&["a", "b"]);
        stack.provider.network = Some("backend".into());
        stack.functions.get_mut("b").expect("b").network = Some("frontend".into());

        let specs = resolve_stack(&stack, &Invocation::new(Operation::Deploy)).expect("resolve");
        assert_eq!(specs[0].network, "backend");
        assert_eq!(specs[1].network, "frontend");
    }

    #[test]
    fn stack_key_wins_over_embedded_name() {
        let mut def = definition("alexellis/faas-url-ping", "./url-ping");
        def.name = Some("foo".into());
        let spec = resolve_function(
            "url-ping",
            &def,
            &Provider::default(),
            &Invocation::new(Operation::Deploy),
        )
        .expect("resolve");
        assert_eq!(spec.name, "url-ping");
    }

    #[test]
    fn provider_gateway_beats_cli_gateway() {
        let mut stack = stack_of(&["a"]);
        stack.provider.gateway = Some("http://provider:8080".into());
        let mut inv = Invocation::new(Operation::Delete);
        inv.gateway = Some("http://flag:8080".into());

        let specs = resolve_stack(&stack, &inv).expect("resolve");
        assert_eq!(specs[0].gateway_url, "http://provider:8080");
    }

    #[test]
    fn cli_gateway_used_when_provider_has_none() {
        let stack = stack_of(&["a"]);
        let mut inv = Invocation::new(Operation::Delete);
        inv.gateway = Some("http://flag:8080".into());

        let specs = resolve_stack(&stack, &inv).expect("resolve");
        assert_eq!(specs[0].gateway_url, "http://flag:8080");
    }

    #[test]
    fn gateway_defaults_to_loopback() {
        let specs =
            resolve_stack(&stack_of(&["a"]), &Invocation::new(Operation::Delete)).expect("resolve");
        assert_eq!(specs[0].gateway_url, DEFAULT_GATEWAY);
    }

    #[test]
    fn replace_flag_is_carried_through() {
        let mut inv = Invocation::new(Operation::Deploy);
        inv.replace = true;
        let specs = resolve_stack(&stack_of(&["a"]), &inv).expect("resolve");
        assert!(specs[0].replace);
    }

    #[test]
    fn stack_build_requires_handler_unless_skipped() {
        let mut stack = stack_of(&["a"]);
        stack.functions.get_mut("a").expect("a").handler = None;
        let err = resolve_stack(&stack, &Invocation::new(Operation::Build)).expect_err("fail");
        assert!(matches!(
            err,
            FnstackError::MissingField { field: "handler", ref function, .. } if function == "a"
        ));

        stack.functions.get_mut("a").expect("a").skip_build = true;
        let specs = resolve_stack(&stack, &Invocation::new(Operation::Build)).expect("resolve");
        assert!(specs[0].skip_build);
    }

    #[test]
    fn stack_delete_needs_no_image() {
        let mut stack = stack_of(&["a"]);
        stack.functions.get_mut("a").expect("a").image = None;
        let specs = resolve_stack(&stack, &Invocation::new(Operation::Delete)).expect("resolve");
        assert_eq!(specs[0].name, "a");
    }

    #[test]
    fn empty_stack_is_a_usage_error() {
        let err = resolve_stack(&StackDefinition::default(), &Invocation::new(Operation::Push))
            .expect_err("fail");
        assert!(matches!(err, FnstackError::Usage { .. }));
    }

    #[test]
    fn stack_language_falls_back_to_cli_default() {
        let mut stack = stack_of(&["a"]);
        stack.functions.get_mut("a").expect("a").lang = None;
        let specs = resolve_stack(&stack, &Invocation::new(Operation::Build)).expect("resolve");
        assert_eq!(specs[0].language, "node");
    }

    #[test]
    fn flag_build_checks_image_then_handler_then_name() {
        let mut inv = Invocation::new(Operation::Build);
        let err = resolve_flags(&inv).expect_err("fail");
        assert!(matches!(err, FnstackError::MissingField { field: "image", .. }));

        inv.flags.image = Some("example/fn".into());
        let err = resolve_flags(&inv).expect_err("fail");
        assert!(matches!(err, FnstackError::MissingField { field: "handler", .. }));

        inv.flags.handler = Some("./fn".into());
        let err = resolve_flags(&inv).expect_err("fail");
        assert!(matches!(err, FnstackError::MissingField { field: "name", .. }));

        inv.flags.name = Some("fn".into());
        assert!(resolve_flags(&inv).is_ok());
    }

    #[test]
    fn flag_deploy_requires_image_and_name() {
        let mut inv = Invocation::new(Operation::Deploy);
        inv.flags.name = Some("url-ping".into());
        let err = resolve_flags(&inv).expect_err("fail");
        assert!(matches!(err, FnstackError::MissingField { field: "image", .. }));

        inv.flags.image = Some("alexellis/faas-url-ping".into());
        let spec = resolve_flags(&inv).expect("resolve");
        assert_eq!(spec.network, DEFAULT_NETWORK);
        assert_eq!(spec.gateway_url, DEFAULT_GATEWAY);
    }

    #[test]
    fn flag_delete_requires_only_name() {
        let mut inv = Invocation::new(Operation::Delete);
        assert!(matches!(
            resolve_flags(&inv).expect_err("fail"),
            FnstackError::MissingField { field: "name", .. }
        ));

        inv.flags.name = Some("url-ping".into());
        let spec = resolve_flags(&inv).expect("resolve");
        assert_eq!(spec.name, "url-ping");
    }

    #[test]
    fn flag_push_is_a_usage_error() {
        let mut inv = Invocation::new(Operation::Push);
        inv.flags.image = Some("example/fn".into());
        inv.flags.name = Some("fn".into());
        let err = resolve(&inv, None).expect_err("fail");
        assert!(matches!(err, FnstackError::Usage { ref message } if message.contains("push")));
    }

    #[test]
    fn flag_env_tokens_are_parsed() {
        let mut inv = Invocation::new(Operation::Deploy);
        inv.flags.name = Some("url-ping".into());
        inv.flags.image = Some("alexellis/faas-url-ping".into());
        inv.flags.env = vec!["MYVAR=myval".into(), "MYOTHERVAR=myotherval".into()];
        let spec = resolve_flags(&inv).expect("resolve");
        assert_eq!(spec.environment["MYVAR"], "myval");
        assert_eq!(spec.environment["MYOTHERVAR"], "myotherval");
    }

    #[test]
    fn malformed_flag_env_aborts_resolution() {
        let mut inv = Invocation::new(Operation::Deploy);
        inv.flags.name = Some("url-ping".into());
        inv.flags.image = Some("alexellis/faas-url-ping".into());
        inv.flags.env = vec!["NOEQUALS".into()];
        assert!(matches!(
            resolve_flags(&inv).expect_err("fail"),
            FnstackError::InvalidEnvVar { .. }
        ));
    }

    #[test]
    fn blank_flag_values_count_as_missing() {
        let mut inv = Invocation::new(Operation::Delete);
        inv.flags.name = Some("   ".into());
        assert!(resolve_flags(&inv).is_err());
    }
}
