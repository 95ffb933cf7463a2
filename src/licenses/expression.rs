use spdx::{Expression, ParseMode};

/// Expand a license expression like `MIT OR Apache-2.0` into its constituent
/// license identifiers, sorted and deduplicated. Parsing is lax, so deprecated
/// identifiers like `GPL-3.0` that still dominate Python metadata expand the
/// same way. `WITH` exception clauses stay attached to their license
/// identifier. An expression that does not parse as SPDX is kept whole as a
/// single license string so it can still be allow-listed verbatim.
pub fn expand_license_expression(expression: &str) -> Vec<String> {
    match Expression::parse_mode(expression, ParseMode::LAX) {
        Ok(parsed) => {
            let mut licenses: Vec<String> = parsed
                .requirements()
                .map(|requirement| requirement.req.to_string())
                .collect();
            licenses.sort();
            licenses.dedup();
            licenses
        }
        Err(_) => vec![expression.to_string()],
    }
}
