//! Merge interface and instance records into one holder per address.

use crate::models::{
    AddressSpace, HolderMap, HolderRecord, HolderSource, InstanceRecord, InterfaceRecord, Tags,
};
use std::net::Ipv4Addr;

/// Build the holder map for `space`.
///
/// Interface records go in first and instance records replace them for the
/// same address. Addresses that do not parse or fall outside the usable
/// range are skipped.
pub fn build_holder_map(
    space: &AddressSpace,
    interfaces: &[InterfaceRecord],
    instances: &[InstanceRecord],
) -> HolderMap {
    let mut holders = HolderMap::new();
    let mut skipped = 0usize;

    for eni in interfaces {
        match usable_address(space, &eni.address) {
            Some(address) => {
                holders.insert(
                    address,
                    HolderRecord {
                        address,
                        descriptor: eni.descriptor.clone(),
                        holder_id: eni.interface_id.clone(),
                        source: HolderSource::Interface,
                        tags: Tags::new(),
                    },
                );
            }
            None => skipped += 1,
        }
    }

    for inst in instances {
        match usable_address(space, &inst.address) {
            Some(address) => {
                if let Some(previous) = holders.get(&address) {
                    log::trace!(
                        "{address}: instance {} replaces {}",
                        inst.instance_id,
                        previous.descriptor
                    );
                }
                holders.insert(
                    address,
                    HolderRecord {
                        address,
                        descriptor: inst.instance_id.clone(),
                        holder_id: inst.instance_id.clone(),
                        source: HolderSource::Instance,
                        tags: inst.tags.clone(),
                    },
                );
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("skipped {skipped} record(s) with addresses outside {space}");
    }
    log::debug!("{} holder(s) in {space}", holders.len());
    holders
}

fn usable_address(space: &AddressSpace, raw: &str) -> Option<Ipv4Addr> {
    match raw.trim().parse::<Ipv4Addr>() {
        Ok(addr) if space.contains(addr) => Some(addr),
        Ok(addr) => {
            log::debug!("{addr} is not a usable address of {space}");
            None
        }
        Err(_) => {
            log::debug!("unparseable address {raw:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eni(address: &str, id: &str, description: &str) -> InterfaceRecord {
        InterfaceRecord {
            address: address.to_string(),
            descriptor: format!("{id} / {description}"),
            interface_id: id.to_string(),
        }
    }

    fn instance(address: &str, id: &str) -> InstanceRecord {
        InstanceRecord {
            address: address.to_string(),
            instance_id: id.to_string(),
            tags: [("Name", "web")].into_iter().collect(),
        }
    }

    #[test]
    fn test_instance_record_wins() {
        let space = AddressSpace::from_cidr("10.0.1.0/24").unwrap();
        let holders = build_holder_map(
            &space,
            &[
                eni("10.0.1.10", "eni-01", "Primary network interface"),
                eni("10.0.1.11", "eni-02", "ELB myelb"),
            ],
            &[instance("10.0.1.10", "i-0abc")],
        );
        assert_eq!(holders.len(), 2);
        let ten = &holders[&"10.0.1.10".parse::<Ipv4Addr>().unwrap()];
        assert_eq!(ten.source, HolderSource::Instance);
        assert_eq!(ten.holder_id, "i-0abc");
        assert_eq!(ten.tags.get("Name"), Some("web"));
        let eleven = &holders[&"10.0.1.11".parse::<Ipv4Addr>().unwrap()];
        assert_eq!(eleven.descriptor, "eni-02 / ELB myelb");
    }

    #[test]
    fn test_skips_foreign_and_bad_addresses() {
        let space = AddressSpace::from_cidr("10.0.1.0/24").unwrap();
        let holders = build_holder_map(
            &space,
            &[
                eni("10.0.2.10", "eni-01", "other subnet"),
                eni("10.0.1.2", "eni-02", "reserved range"),
                eni("not-an-ip", "eni-03", "broken"),
            ],
            &[instance("10.0.1.20", "i-1")],
        );
        assert_eq!(holders.len(), 1);
        assert!(holders.contains_key(&Ipv4Addr::new(10, 0, 1, 20)));
    }

    #[test]
    fn test_duplicate_interface_addresses_collapse() {
        let space = AddressSpace::from_cidr("10.0.1.0/24").unwrap();
        let holders = build_holder_map(
            &space,
            &[
                eni("10.0.1.30", "eni-01", "first"),
                eni("10.0.1.30", "eni-01", "first"),
            ],
            &[],
        );
        assert_eq!(holders.len(), 1);
    }
}
