use super::print_json;
use nexo_domain::requests;
use nexo_validation::RequestContext;
use serde_json::{json, Value};

/// Name and rule table of every request
pub fn describe_all() -> Vec<Value> {
    let ctx = RequestContext::new().user(1);
    requests::all()
        .iter()
        .map(|request| json!({ "name": request.name(), "rules": request.rules(&ctx).describe() }))
        .collect()
}

pub fn run(as_json: bool) -> anyhow::Result<()> {
    let described = describe_all();
    if as_json {
        return print_json(&described);
    }

    for request in &described {
        println!("{}", request["name"].as_str().unwrap_or_default());
        for field in request["rules"]["fields"].as_array().into_iter().flatten() {
            let rules: Vec<&str> = field["rules"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .collect();
            println!("   {:<24} {}", field["field"].as_str().unwrap_or_default(), rules.join("|"));
        }
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_request_is_described() {
        let described = describe_all();
        assert_eq!(described.len(), requests::all().len());

        let interaction = described
            .iter()
            .find(|r| r["name"] == "record_interaction")
            .unwrap();
        let fields = interaction["rules"]["fields"].as_array().unwrap();
        assert!(fields.iter().any(|f| f["field"] == "follow_up_date"));
    }
}
