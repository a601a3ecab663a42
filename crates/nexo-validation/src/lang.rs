//! Spanish message catalogue for the built-in rules

use crate::error::ValidationError;
use serde_json::Value;

/// Message template for a rule code
pub fn template(code: &str) -> &'static str {
    match code {
        "accepted" => "El campo :attribute debe ser aceptado.",
        "after" => "El campo :attribute debe ser una fecha posterior a :date.",
        "after_or_equal" => "El campo :attribute debe ser una fecha posterior o igual a :date.",
        "alpha_dash" => "El campo :attribute solo debe contener letras, números, guiones y guiones bajos.",
        "array" => "El campo :attribute debe ser un conjunto.",
        "before" => "El campo :attribute debe ser una fecha anterior a :date.",
        "before_or_equal" => "El campo :attribute debe ser una fecha anterior o igual a :date.",
        "between.array" => "El campo :attribute tiene que tener entre :min - :max elementos.",
        "between.numeric" => "El campo :attribute tiene que estar entre :min - :max.",
        "between.string" => "El campo :attribute tiene que tener entre :min - :max caracteres.",
        "boolean" => "El campo :attribute debe tener un valor verdadero o falso.",
        "confirmed" => "La confirmación de :attribute no coincide.",
        "date" => "El campo :attribute no es una fecha válida.",
        "different" => "El campo :attribute y :other deben ser diferentes.",
        "email" => "El campo :attribute no es un correo válido.",
        "exists" => "El campo :attribute seleccionado no existe.",
        "in" => "El campo :attribute seleccionado no es válido.",
        "integer" => "El campo :attribute debe ser un número entero.",
        "ip" => "El campo :attribute debe ser una dirección IP válida.",
        "max.array" => "El campo :attribute no debe tener más de :max elementos.",
        "max.numeric" => "El campo :attribute no debe ser mayor que :max.",
        "max.string" => "El campo :attribute no debe ser mayor que :max caracteres.",
        "min.array" => "El campo :attribute debe tener al menos :min elementos.",
        "min.numeric" => "El tamaño de :attribute debe ser de al menos :min.",
        "min.string" => "El campo :attribute debe contener al menos :min caracteres.",
        "not_in" => "El campo :attribute seleccionado no es válido.",
        "numeric" => "El campo :attribute debe ser numérico.",
        "presence_unavailable" => "No se ha podido comprobar el campo :attribute.",
        "regex" => "El formato del campo :attribute no es válido.",
        "required" => "El campo :attribute es obligatorio.",
        "required_if" => "El campo :attribute es obligatorio cuando :other es :value.",
        "required_unless" => "El campo :attribute es obligatorio a menos que :other esté en :values.",
        "required_with" => "El campo :attribute es obligatorio cuando :values está presente.",
        "required_without" => "El campo :attribute es obligatorio cuando :values no está presente.",
        "same" => "Los campos :attribute y :other deben coincidir.",
        "size.array" => "El campo :attribute debe contener :size elementos.",
        "size.numeric" => "El tamaño de :attribute debe ser :size.",
        "size.string" => "El campo :attribute debe contener :size caracteres.",
        "string" => "El campo :attribute debe ser una cadena de caracteres.",
        "unique" => "El campo :attribute ya ha sido registrado.",
        "url" => "El campo :attribute debe ser una URL válida.",
        "uuid" => "El campo :attribute debe ser un UUID válido.",
        _ => "El campo :attribute no es válido.",
    }
}

/// Human form of a field name: `follow_up_date` -> `follow up date`
pub fn display_attribute(field: &str) -> String {
    field.replace('_', " ")
}

/// Spanish rendering of the relative date keywords accepted by date rules
pub fn date_keyword(keyword: &str) -> Option<&'static str> {
    match keyword {
        "today" => Some("hoy"),
        "tomorrow" => Some("mañana"),
        "yesterday" => Some("ayer"),
        "now" => Some("ahora"),
        _ => None,
    }
}

/// Replace `:attribute` and every placeholder found in `params`
pub fn render(template: &str, attribute: &str, params: Option<&Value>) -> String {
    let mut message = template.replace(":attribute", attribute);

    if let Some(Value::Object(map)) = params {
        // longest keys first so `:values` is not clobbered by `:value`
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
        for key in keys {
            let placeholder = format!(":{}", key);
            if message.contains(&placeholder) {
                message = message.replace(&placeholder, &param_text(&map[key.as_str()]));
            }
        }
    }

    message
}

/// Text form of a placeholder value
pub fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(true) => "verdadero".to_string(),
        Value::Bool(false) => "falso".to_string(),
        Value::Array(items) => items.iter().map(param_text).collect::<Vec<_>>().join(", "),
        Value::Null => String::new(),
        Value::Object(_) => value.to_string(),
    }
}

/// Build an error for `code` rendered with the default attribute name
pub fn error(field: &str, code: &str, params: Value) -> ValidationError {
    let params = if params.is_null() { None } else { Some(params) };
    let message = render(template(code), &display_attribute(field), params.as_ref());
    let error = ValidationError::with_code(field, message, code);
    match params {
        Some(p) => error.context(p),
        None => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_replaces_placeholders() {
        let message = render(
            template("between.numeric"),
            "duración",
            Some(&json!({"min": 1, "max": 480})),
        );
        assert_eq!(message, "El campo duración tiene que estar entre 1 - 480.");
    }

    #[test]
    fn test_values_not_clobbered_by_value() {
        let message = render(
            ":value / :values",
            "x",
            Some(&json!({"value": "a", "values": ["b", "c"]})),
        );
        assert_eq!(message, "a / b, c");
    }

    #[test]
    fn test_display_attribute() {
        assert_eq!(display_attribute("follow_up_date"), "follow up date");
    }

    #[test]
    fn test_error_uses_default_attribute() {
        let err = error("media_url", "required", Value::Null);
        assert_eq!(err.message, "El campo media url es obligatorio.");
        assert_eq!(err.code, "required");
        assert!(err.context.is_none());
    }

    #[test]
    fn test_float_params_are_trimmed() {
        assert_eq!(param_text(&json!(10.0)), "10");
        assert_eq!(param_text(&json!(0.5)), "0.5");
    }
}
