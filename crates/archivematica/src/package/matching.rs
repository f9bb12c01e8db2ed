//! Pairing DIPs with the AIPs they were generated from.
//!
//! The Storage Service stores a DIP under a path ending in its AIP's UUID.
//! Matching is a plain suffix comparison on `current_path`.

use std::collections::BTreeMap;

use crate::record::Record;

/// Whether `dip` was generated from the AIP with `aip_uuid`.
pub fn dip_matches_aip(dip: &Record, aip_uuid: &str) -> bool {
    dip.current_path()
        .is_some_and(|path| path.ends_with(aip_uuid))
}

/// Map each AIP UUID to the UUIDs of its DIPs.
///
/// Every AIP gets an entry, possibly empty. Each DIP is listed under at most
/// one AIP: once matched it is dropped from the pool checked against later
/// AIPs.
pub fn map_aips_to_dips<'a, A>(aips: A, dips: &[Record]) -> BTreeMap<String, Vec<String>>
where
    A: IntoIterator<Item = &'a Record>,
{
    let mut mapping = BTreeMap::new();
    let mut pool: Vec<&Record> = dips.iter().collect();

    for aip in aips {
        let Some(aip_uuid) = aip.uuid() else {
            continue;
        };

        let (matched, rest): (Vec<&Record>, Vec<&Record>) = pool
            .into_iter()
            .partition(|dip| dip_matches_aip(dip, aip_uuid));
        pool = rest;

        let entry: &mut Vec<String> = mapping.entry(aip_uuid.to_string()).or_default();
        entry.extend(
            matched
                .into_iter()
                .filter_map(|dip| dip.uuid().map(str::to_string)),
        );
    }

    mapping
}

/// The DIPs generated from one AIP, in listing order.
pub fn dips_for_aip<'a, D>(dips: D, aip_uuid: &str) -> Vec<Record>
where
    D: IntoIterator<Item = &'a Record>,
{
    dips.into_iter()
        .filter(|dip| dip_matches_aip(dip, aip_uuid))
        .cloned()
        .collect()
}
