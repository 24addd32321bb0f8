//! Translation from structured-client naming to AWS CLI naming

use crate::aws::request::ArgValue;

/// `BucketName` -> `bucket-name`
///
/// A separator goes before every uppercase letter except a leading one, so
/// acronyms split per letter (`AccessKeyID` -> `access-key-i-d`), exactly as
/// the CLI's own flag generator does. Already-kebab input is returned as is.
pub fn flag_name(key: &str) -> String {
    let mut flag = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                flag.push('-');
            }
            flag.push(c.to_ascii_lowercase());
        } else {
            flag.push(c);
        }
    }
    flag
}

/// `describe_stacks` -> `describe-stacks`
pub fn subcommand_name(operation: &str) -> String {
    operation.replace('_', "-")
}

/// Render an argument value the way the CLI expects it on the command line
pub fn encode_value(value: &ArgValue) -> String {
    match value {
        ArgValue::Text(s) => s.clone(),
        ArgValue::List(items) => items.join(","),
        ArgValue::Bool(b) => b.to_string(),
        ArgValue::Int(n) => n.to_string(),
    }
}

/// `--<flag>=<value>`
pub fn flag_arg(key: &str, value: &ArgValue) -> String {
    format!("--{}={}", flag_name(key), encode_value(value))
}
