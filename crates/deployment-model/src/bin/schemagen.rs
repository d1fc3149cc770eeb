//! Prints the JSON schema of the manifest topology sections.

use deployment_model::TopologySpec;

fn main() -> Result<(), serde_json::Error> {
    let schema = schemars::schema_for!(TopologySpec);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
