const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;

pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0".to_string();
    }
    if amount >= CRORE {
        format!("₹{:.2} Cr", amount / CRORE)
    } else if amount >= LAKH {
        format!("₹{:.2} L", amount / LAKH)
    } else {
        format!("₹{}", group_indian(amount.round()))
    }
}

pub fn format_inr_grouped(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0".to_string();
    }
    format!("₹{}", group_indian(amount.round()))
}

pub fn round_thousand(amount: f64) -> f64 {
    (amount / 1_000.0).round() * 1_000.0
}

fn group_indian(amount: f64) -> String {
    let negative = amount < 0.0;
    let digits = format!("{:.0}", amount.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            parts.push(&head[end - 2..end]);
            end -= 2;
        }
        parts.push(&head[..end]);
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
