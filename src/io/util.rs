use crate::model::types::BondOrder;

/// Normalizes an element token (`CL`, `cl`, `Cl`) to its symbol spelling.
///
/// Tokens must be one to three ASCII letters; anything else (query atoms,
/// R-groups, numbered labels) is rejected.
pub fn element_symbol(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() || token.len() > 3 || !token.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut chars = token.chars();
    let first = chars.next()?.to_ascii_uppercase();
    Some(
        std::iter::once(first)
            .chain(chars.map(|c| c.to_ascii_lowercase()))
            .collect(),
    )
}

pub fn bond_order_from_ctfile(code: i32) -> Option<BondOrder> {
    match code {
        1 => Some(BondOrder::Single),
        2 => Some(BondOrder::Double),
        3 => Some(BondOrder::Triple),
        4 => Some(BondOrder::Aromatic),
        _ => None,
    }
}

pub fn bond_order_to_ctfile(order: BondOrder) -> i32 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

/// Extracts `TAG` from a data header line such as `>  <TAG>  (12)`.
pub fn data_item_tag(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    let start = rest.find('<')? + 1;
    let len = rest[start..].find('>')?;
    let tag = rest[start..start + len].trim();
    (!tag.is_empty()).then_some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_symbol_normalizes_case() {
        assert_eq!(element_symbol("CL").as_deref(), Some("Cl"));
        assert_eq!(element_symbol(" c ").as_deref(), Some("C"));
        assert_eq!(element_symbol("Br").as_deref(), Some("Br"));
    }

    #[test]
    fn element_symbol_rejects_labels() {
        assert_eq!(element_symbol(""), None);
        assert_eq!(element_symbol("R#"), None);
        assert_eq!(element_symbol("C12"), None);
        assert_eq!(element_symbol("Abcd"), None);
    }

    #[test]
    fn ctfile_codes_map_both_ways() {
        for code in 1..=4 {
            let order = bond_order_from_ctfile(code).unwrap();
            assert_eq!(bond_order_to_ctfile(order), code);
        }
        assert_eq!(bond_order_from_ctfile(8), None);
    }

    #[test]
    fn data_item_tag_handles_common_header_forms() {
        assert_eq!(data_item_tag("> <SMILES>"), Some("SMILES"));
        assert_eq!(data_item_tag(">  <docking score>  (3)"), Some("docking score"));
        assert_eq!(data_item_tag("> 25 <ID>"), Some("ID"));
        assert_eq!(data_item_tag("> <>"), None);
        assert_eq!(data_item_tag("M  END"), None);
    }
}
