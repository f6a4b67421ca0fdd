use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::node::ContentNode;
use crate::TransferError;

/// Direction and medium of a transfer
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferType {
    /// Import from a drive attached to the device
    LocalImport,
    /// Import over the network
    RemoteImport,
    /// Export to a drive attached to the device
    LocalExport,
}

impl TransferType {
    /// Derive the transfer type from how the wizard was entered
    pub fn from_source(for_export: bool, drive_id: Option<&str>) -> Self {
        match (for_export, drive_id) {
            (true, _) => TransferType::LocalExport,
            (false, Some(_)) => TransferType::LocalImport,
            (false, None) => TransferType::RemoteImport,
        }
    }

    pub fn is_import(&self) -> bool {
        !matches!(self, TransferType::LocalExport)
    }

    /// Whether `node` is listed among its parent's children
    pub fn is_visible(&self, node: &ContentNode) -> bool {
        match self {
            TransferType::RemoteImport => true,
            TransferType::LocalImport => node.importable,
            TransferType::LocalExport => node.available,
        }
    }

    /// Resources under `node` that this transfer could actually move
    pub fn eligible_resources(&self, node: &ContentNode) -> u64 {
        if self.is_import() {
            node.total_resources
                .saturating_sub(node.on_device_resources)
        } else {
            node.on_device_resources
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferType::LocalImport => "local-import",
            TransferType::RemoteImport => "remote-import",
            TransferType::LocalExport => "local-export",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TransferType {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local-import" | "localimport" => Ok(TransferType::LocalImport),
            "remote-import" | "remoteimport" => Ok(TransferType::RemoteImport),
            "local-export" | "localexport" => Ok(TransferType::LocalExport),
            other => Err(TransferError::Config(format!(
                "unknown transfer type: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    use rstest::rstest;

    #[rstest]
    #[case(true, None, TransferType::LocalExport)]
    #[case(true, Some("drive_1"), TransferType::LocalExport)]
    #[case(false, Some("drive_1"), TransferType::LocalImport)]
    #[case(false, None, TransferType::RemoteImport)]
    fn transfer_type_from_source(
        #[case] for_export: bool,
        #[case] drive_id: Option<&str>,
        #[case] expected: TransferType,
    ) {
        assert_eq!(TransferType::from_source(for_export, drive_id), expected);
    }

    #[test]
    fn eligible_resources_depend_on_direction() {
        let mut node = ContentNode::topic("topic", 10);
        node.on_device_resources = 4;
        assert_eq!(TransferType::RemoteImport.eligible_resources(&node), 6);
        assert_eq!(TransferType::LocalImport.eligible_resources(&node), 6);
        assert_eq!(TransferType::LocalExport.eligible_resources(&node), 4);

        let leaf = ContentNode::leaf("leaf", NodeKind::Audio);
        assert_eq!(TransferType::LocalExport.eligible_resources(&leaf), 0);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for transfer_type in [
            TransferType::LocalImport,
            TransferType::RemoteImport,
            TransferType::LocalExport,
        ] {
            let parsed: TransferType =
                transfer_type.to_string().parse().unwrap();
            assert_eq!(parsed, transfer_type);
        }
        assert!("sideload".parse::<TransferType>().is_err());
    }
}
