//! ARM Path Template to Resource ID Code Generator
//!
//! Generates `define_resource_id!` invocations, plus format/parse tests, for
//! azurerm-provider service modules.
//!
//! Usage:
//!   # A single ID type
//!   azurerm-codegen --name ExpressRoutePort \
//!     --template '/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/expressRoutePorts/{expressRoutePortName}'
//!
//!   # Every item path of an ARM OpenAPI document
//!   azurerm-codegen --swagger network.json --output parse.rs

use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result, bail};
use azurerm_resourceids::{Segment, SegmentKind, format_id};
use clap::Parser;
use heck::{ToSnakeCase, ToTitleCase, ToUpperCamelCase};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "azurerm-codegen")]
#[command(about = "Generate typed resource IDs from ARM path templates")]
struct Args {
    /// ID type name without the `Id` suffix (e.g., ExpressRoutePort)
    #[arg(long, requires = "template", conflicts_with = "swagger")]
    name: Option<String>,

    /// ARM path template with `{placeholder}` value segments
    #[arg(long, requires = "name")]
    template: Option<String>,

    /// ARM OpenAPI document to read item paths from
    #[arg(long, required_unless_present = "name")]
    swagger: Option<String>,

    /// Output file (writes to stdout if not specified)
    #[arg(long, short)]
    output: Option<String>,
}

/// The part of an OpenAPI document listing operation paths
#[derive(Debug, Deserialize)]
struct SwaggerDocument {
    #[serde(default)]
    paths: BTreeMap<String, serde_json::Value>,
}

/// One ID type to generate
#[derive(Debug, Clone, PartialEq, Eq)]
struct IdDefinition {
    /// Rust type name, e.g. `ExpressRoutePortId`
    type_name: String,
    /// e.g. `Express Route Port`
    description: String,
    template: String,
    fields: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let definitions = match (&args.name, &args.template, &args.swagger) {
        (Some(name), Some(template), _) => vec![definition(name, template)?],
        (_, _, Some(path)) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            let document: SwaggerDocument =
                serde_json::from_str(&content).context("Failed to parse OpenAPI document")?;
            definitions_from_swagger(&document)?
        }
        _ => bail!("either --name and --template, or --swagger is required"),
    };

    let code = generate_code(&definitions);

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &code)
            .with_context(|| format!("Failed to write to: {}", output_path))?;
        eprintln!("Generated {} ID types: {}", definitions.len(), output_path);
    } else {
        println!("{}", code);
    }

    Ok(())
}

/// Build one ID definition, checking the template ends in a value segment
fn definition(name: &str, template: &str) -> Result<IdDefinition> {
    let segments = Segment::parse_template(template);
    if !segments.last().is_some_and(Segment::is_value) {
        bail!("template must end with a {{placeholder}} segment: {}", template);
    }

    let mut seen = HashSet::new();
    let mut fields = Vec::new();
    for segment in segments.iter().filter(|s| s.is_value()) {
        let field = field_name(segment);
        if !seen.insert(field.clone()) {
            bail!("placeholder {} appears twice in {}", segment.name, template);
        }
        fields.push(field);
    }

    let base = name.trim_end_matches("Id").to_upper_camel_case();
    Ok(IdDefinition {
        type_name: format!("{}Id", base),
        description: base.to_title_case(),
        template: normalize_template(&segments),
        fields,
    })
}

fn field_name(segment: &Segment) -> String {
    match segment.kind {
        SegmentKind::SubscriptionId => "subscription_id".to_string(),
        SegmentKind::ResourceGroup => "resource_group_name".to_string(),
        _ => {
            let field = segment.name.to_snake_case();
            match field.as_str() {
                "type" | "ref" | "self" | "crate" | "mod" | "fn" => format!("{}_", field),
                _ => field,
            }
        }
    }
}

/// Template text with the canonical casing of well-known segments
fn normalize_template(segments: &[Segment]) -> String {
    let mut template = String::new();
    for segment in segments {
        template.push('/');
        match &segment.kind {
            SegmentKind::Static(v) if v.eq_ignore_ascii_case("subscriptions") => template.push_str("subscriptions"),
            SegmentKind::Static(v) if v.eq_ignore_ascii_case("resourceGroups") => template.push_str("resourceGroups"),
            SegmentKind::Static(v) if v.eq_ignore_ascii_case("providers") => template.push_str("providers"),
            SegmentKind::Static(v) | SegmentKind::ResourceProvider(v) => template.push_str(v),
            SegmentKind::SubscriptionId => template.push_str("{subscriptionId}"),
            SegmentKind::ResourceGroup => template.push_str("{resourceGroupName}"),
            SegmentKind::UserSpecified => {
                template.push('{');
                template.push_str(&segment.name);
                template.push('}');
            }
        }
    }
    template
}

/// One definition per distinct resource item path
///
/// Item paths end in a placeholder directly after a fixed collection name
/// below `providers`; action and collection paths are skipped.
fn definitions_from_swagger(document: &SwaggerDocument) -> Result<Vec<IdDefinition>> {
    let mut definitions: Vec<IdDefinition> = Vec::new();
    let mut templates = HashSet::new();

    for path in document.paths.keys() {
        let segments = Segment::parse_template(path);
        let Some(provider_pos) = segments
            .iter()
            .position(|s| matches!(s.kind, SegmentKind::ResourceProvider(_)))
        else {
            continue;
        };
        if !segments.last().is_some_and(Segment::is_value) {
            continue;
        }

        let template = normalize_template(&segments);
        if !templates.insert(template.to_ascii_lowercase()) {
            continue;
        }

        let name: String = segments[provider_pos + 1..]
            .iter()
            .filter_map(|s| match &s.kind {
                SegmentKind::Static(v) => Some(singular(v).to_upper_camel_case()),
                _ => None,
            })
            .collect();
        if name.is_empty() {
            continue;
        }

        let definition = definition(&name, &template)?;
        if definitions.iter().any(|d| d.type_name == definition.type_name) {
            eprintln!("skipping {}: {} is already defined", path, definition.type_name);
            continue;
        }
        definitions.push(definition);
    }

    if definitions.is_empty() {
        bail!("no resource item paths found");
    }
    Ok(definitions)
}

fn singular(collection: &str) -> String {
    if let Some(stem) = collection.strip_suffix("ies") {
        format!("{}y", stem)
    } else if collection.ends_with("ses") || collection.ends_with("xes") {
        collection[..collection.len() - 2].to_string()
    } else if let Some(stem) = collection.strip_suffix('s') {
        stem.to_string()
    } else {
        collection.to_string()
    }
}

fn generate_code(definitions: &[IdDefinition]) -> String {
    let mut code = String::from(
        r#"//! Resource IDs
//!
//! DO NOT EDIT MANUALLY - regenerate with azurerm-codegen

use azurerm_resourceids::define_resource_id;
"#,
    );

    for d in definitions {
        code.push_str(&format!(
            r#"
define_resource_id!(
    {},
    "{}",
    "{}",
    {{ {} }}
);
"#,
            d.type_name,
            d.description,
            d.template,
            d.fields.join(", ")
        ));
    }

    code.push_str(
        r#"
#[cfg(test)]
mod tests {
    use super::*;
    use azurerm_resourceids::ResourceId;
    use azurerm_resourceids::testing::check_resource_id;
"#,
    );

    for d in definitions {
        let segments = Segment::parse_template(&d.template);
        let values: Vec<String> = segments
            .iter()
            .filter(|s| s.is_value())
            .map(Segment::example_value)
            .collect();
        let args: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
        code.push_str(&format!(
            r#"
    #[test]
    fn {test}() {{
        let id = {ty}::new({args});
        assert_eq!(id.id(), "{example}");
        assert_eq!({ty}::parse(&id.id()), Ok(id));
        check_resource_id::<{ty}>();
    }}
"#,
            test = d.type_name.to_snake_case(),
            ty = d.type_name,
            args = args.join(", "),
            example = format_id(&segments, &values),
        ));
    }

    code.push_str("}\n");
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORT_TEMPLATE: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/expressRoutePorts/{expressRoutePortName}";

    #[test]
    fn test_definition_from_template() {
        let d = definition("ExpressRoutePort", PORT_TEMPLATE).unwrap();
        assert_eq!(d.type_name, "ExpressRoutePortId");
        assert_eq!(d.description, "Express Route Port");
        assert_eq!(d.template, PORT_TEMPLATE);
        assert_eq!(
            d.fields,
            vec!["subscription_id", "resource_group_name", "express_route_port_name"]
        );
    }

    #[test]
    fn test_definition_rejects_collection_paths() {
        assert!(definition("Ports", "/subscriptions/{subscriptionId}/providers/Microsoft.Network/expressRoutePorts").is_err());
    }

    #[test]
    fn test_template_casing_is_normalized() {
        let d = definition(
            "Factory",
            "/subscriptions/{subscriptionId}/resourcegroups/{rg}/providers/Microsoft.DataFactory/factories/{factoryName}",
        )
        .unwrap();
        assert_eq!(
            d.template,
            "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.DataFactory/factories/{factoryName}"
        );
        assert_eq!(d.fields, vec!["subscription_id", "resource_group_name", "factory_name"]);
    }

    #[test]
    fn test_swagger_item_paths() {
        let document: SwaggerDocument = serde_json::from_value(serde_json::json!({
            "paths": {
                "/subscriptions/{subscriptionId}/providers/Microsoft.Network/ExpressRoutePorts": {},
                "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/ExpressRoutePorts/{expressRoutePortName}": {},
                "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/ExpressRoutePorts/{expressRoutePortName}/links/{linkName}": {},
                "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/expressRoutePorts/{expressRoutePortName}/generateLoa": {}
            }
        }))
        .unwrap();

        let definitions = definitions_from_swagger(&document).unwrap();
        let names: Vec<&str> = definitions.iter().map(|d| d.type_name.as_str()).collect();
        assert_eq!(names, vec!["ExpressRoutePortId", "ExpressRoutePortLinkId"]);
        assert_eq!(definitions[1].fields.last().map(String::as_str), Some("link_name"));
    }

    #[test]
    fn test_singular() {
        assert_eq!(singular("factories"), "factory");
        assert_eq!(singular("expressRoutePorts"), "expressRoutePort");
        assert_eq!(singular("diskEncryptionSets"), "diskEncryptionSet");
        assert_eq!(singular("addresses"), "address");
        assert_eq!(singular("data"), "data");
    }

    #[test]
    fn test_generated_code() {
        let code = generate_code(&[definition("ExpressRoutePort", PORT_TEMPLATE).unwrap()]);
        assert!(code.contains("use azurerm_resourceids::define_resource_id;"));
        assert!(code.contains("    ExpressRoutePortId,\n    \"Express Route Port\",\n"));
        assert!(code.contains("{ subscription_id, resource_group_name, express_route_port_name }"));
        assert!(code.contains("fn express_route_port_id()"));
        assert!(code.contains(
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/example-resource-group/providers/Microsoft.Network/expressRoutePorts/expressRoutePortValue"
        ));
        assert!(code.contains("check_resource_id::<ExpressRoutePortId>();"));
    }
}
