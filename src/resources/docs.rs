pub const API_CATEGORIES: &str = "\
TM Forum Open APIs are organized into these main categories:

1. Customer Management APIs
   - Customer management, engagement and experience
   - Party management and privacy

2. Product Management APIs
   - Product catalog and inventory
   - Product ordering and qualification
   - Product specification and offering management
   - Product quote management
   - Product configuration management

3. Service Management APIs
   - Service catalog and inventory
   - Service ordering and activation
   - Service quality, problem and test management
   - Service performance management
   - Service level agreement and assurance management

4. Resource Management APIs
   - Resource catalog and inventory
   - Resource ordering and activation
   - Resource function, performance and trouble management

5. Common APIs
   - Event, notification and alarm management
   - Usage management
   - Audit, authorization and identity management
";

pub const USAGE_GUIDE: &str = "\
Working with the TMF620 Product Catalog tools

Every resource kind has four tools: <prefix>_get, <prefix>_create,
<prefix>_update and <prefix>_delete. Prefixes: catalog, category,
product_specification, product_offering, product_offering_price.

Typical flow for a sellable product:

1. product_specification_create {\"data\": {\"name\": \"Fibre Access\"}}
   Keep the returned id.
2. category_create {\"data\": {\"name\": \"Broadband\"}} (optional)
3. product_offering_create with
   \"productSpecification\": {\"id\": <spec id>, \"@referredType\": \"ProductSpecification\"}
   and optionally \"category\": [{\"id\": <category id>, \"@referredType\": \"Category\"}]
4. product_offering_price_create {\"data\": {\"name\": ..., \"priceType\": \"recurring\",
   \"price\": {\"unit\": \"EUR\", \"value\": 39.99}}}
5. product_offering_update {\"id\": <offering id>, \"data\": {\"productOfferingPrice\":
   [{\"id\": <price id>, \"@referredType\": \"ProductOfferingPrice\"}]}}
   The offering references the price; the price does not point back.

Retrieval: <prefix>_get without an id lists resources. Narrow the list with
\"fields\" (comma-separated), \"offset\", \"limit\" and \"filter\", e.g.
{\"filter\": {\"lifecycleStatus\": \"Active\"}}.

Failures always come back as {\"error\": {\"kind\", \"message\", \"status\"?}}
where kind is one of timeout, transport, status, decode, invalid_arguments.

Read-only resources: tmf620://<path> lists a kind, tmf620://<path>/<id> reads
one item, schema://tmf620/<path> describes its fields.
";
