//! Unit tests for wh-core primitives.

#[cfg(test)]
mod ids {
    use crate::{NodeId, SlotId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(SlotId(1) < SlotId(2));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn display_is_bare_integer() {
        assert_eq!(NodeId(7).to_string(), "7");
        assert_eq!(SlotId(12).to_string(), "12");
    }

    #[test]
    fn oversized_index_rejected() {
        assert!(NodeId::try_from(u64::MAX as usize).is_err());
    }
}

#[cfg(test)]
mod node {
    use crate::{GridPos, NodeKind};

    #[test]
    fn kind_labels_roundtrip() {
        for kind in [
            NodeKind::Aisle,
            NodeKind::Shelf,
            NodeKind::AgvStart,
            NodeKind::Shipping,
            NodeKind::PalletSpawn,
        ] {
            assert_eq!(kind.as_str().parse::<NodeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_parse_error() {
        assert!("loading_dock".parse::<NodeKind>().is_err());
    }

    #[test]
    fn left_of_first_column_is_none() {
        assert_eq!(GridPos::new(3, 0).left(), None);
        assert_eq!(GridPos::new(3, 5).left(), Some(GridPos::new(3, 4)));
    }

    #[test]
    fn manhattan() {
        assert_eq!(GridPos::new(0, 0).manhattan(GridPos::new(2, 3)), 5);
        assert_eq!(GridPos::new(4, 1).manhattan(GridPos::new(1, 4)), 6);
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::DispatchConfig;

    #[test]
    fn defaults() {
        let c = DispatchConfig::default();
        assert_eq!(c.topic_prefix, "warehouse");
        assert_eq!(c.min_slots, 1);
        assert_eq!(c.prerequisite_timeout(), Duration::from_secs(10));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_prefix_rejected() {
        let c = DispatchConfig { topic_prefix: "  ".into(), ..DispatchConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn wildcard_prefix_rejected() {
        let c = DispatchConfig { topic_prefix: "warehouse/#".into(), ..DispatchConfig::default() };
        assert!(c.validate().is_err());
        let c = DispatchConfig { topic_prefix: "warehouse/".into(), ..DispatchConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn empty_dispatcher_id_rejected() {
        let c = DispatchConfig { dispatcher_id: String::new(), ..DispatchConfig::default() };
        assert!(c.validate().is_err());
    }
}
