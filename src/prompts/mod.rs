//! Prompt templates. Pure interpolation: every prompt renders for any
//! argument map, with `<name>` standing in for a missing argument.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptArg {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptDef {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [PromptArg],
}

const fn arg(name: &'static str, description: &'static str, required: bool) -> PromptArg {
    PromptArg { name, description, required }
}

pub static PROMPTS: &[PromptDef] = &[
    PromptDef {
        name: "create_catalog",
        description: "Create a new product catalog",
        arguments: &[
            arg("name", "Catalog name", true),
            arg("description", "Catalog description", false),
        ],
    },
    PromptDef {
        name: "create_product_offering",
        description: "Create a product offering for an existing product specification",
        arguments: &[
            arg("name", "Offering name", true),
            arg("specification_id", "Id of the product specification being offered", true),
            arg("category_id", "Id of a category to place the offering in", false),
        ],
    },
    PromptDef {
        name: "price_product_offering",
        description: "Create a price and attach it to a product offering",
        arguments: &[
            arg("offering_id", "Id of the product offering", true),
            arg("amount", "Price amount, e.g. 39.99", true),
            arg("currency", "ISO 4217 currency code, e.g. EUR", true),
            arg("recurring_period", "Charge period such as month; one-time price when absent", false),
        ],
    },
    PromptDef {
        name: "update_description",
        description: "Change the description of any catalog resource",
        arguments: &[
            arg("resource", "Tool prefix of the resource kind, e.g. product_offering", true),
            arg("id", "Resource id", true),
            arg("description", "New description", true),
        ],
    },
    PromptDef {
        name: "catalog_overview",
        description: "Summarize what the product catalog currently contains",
        arguments: &[],
    },
];

pub fn find(name: &str) -> Option<&'static PromptDef> {
    PROMPTS.iter().find(|p| p.name == name)
}

/// Render a prompt. `None` only for an unknown prompt name.
pub fn render(name: &str, args: &HashMap<String, String>) -> Option<String> {
    let get = |key: &str| -> String {
        args.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("<{key}>"))
    };
    let opt = |key: &str| args.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let text = match name {
        "create_catalog" => {
            let mut s = format!(
                "Create a product catalog named \"{}\" using the catalog_create tool.",
                get("name")
            );
            if let Some(desc) = opt("description") {
                s.push_str(&format!(" Set its description to \"{desc}\"."));
            }
            s.push_str(" Use catalogType \"Product\", version \"1.0\" and lifecycleStatus \"Active\", then report the new catalog id.");
            s
        }
        "create_product_offering" => {
            let mut s = format!(
                "Create a product offering named \"{}\" with the product_offering_create tool. \
                 Reference product specification {} as \
                 {{\"id\": \"{}\", \"@referredType\": \"ProductSpecification\"}}.",
                get("name"),
                get("specification_id"),
                get("specification_id"),
            );
            if let Some(category) = opt("category_id") {
                s.push_str(&format!(
                    " Place it in category {category} via \"category\": [{{\"id\": \"{category}\", \"@referredType\": \"Category\"}}]."
                ));
            }
            s.push_str(" Report the new offering id.");
            s
        }
        "price_product_offering" => {
            let price = match opt("recurring_period") {
                Some(period) => format!(
                    "a recurring price of {} {} per {period} (priceType \"recurring\", recurringChargePeriodType \"{period}\")",
                    get("amount"),
                    get("currency"),
                ),
                None => format!(
                    "a one-time price of {} {} (priceType \"oneTime\")",
                    get("amount"),
                    get("currency"),
                ),
            };
            format!(
                "Create {price} with the product_offering_price_create tool, using \
                 \"price\": {{\"unit\": \"{}\", \"value\": {}}}. Then read product offering {} with \
                 product_offering_get, append the new price to its productOfferingPrice list and save it \
                 with product_offering_update. Do not add a productOffering reference to the price.",
                get("currency"),
                get("amount"),
                get("offering_id"),
            )
        }
        "update_description" => format!(
            "Use the {}_update tool to set the description of resource {} to \"{}\". \
             Send only {{\"description\": ...}} in data, then confirm the change with {}_get.",
            get("resource"),
            get("id"),
            get("description"),
            get("resource"),
        ),
        "catalog_overview" => "Give an overview of the product catalog. List catalogs with catalog_get, \
             categories with category_get, product specifications with product_specification_get, \
             product offerings with product_offering_get and prices with product_offering_price_get. \
             Use the fields argument (e.g. \"id,name,lifecycleStatus\") to keep responses small, \
             then summarize counts per kind and any offerings without a price."
            .to_string(),
        _ => return None,
    };
    Some(text)
}
