use crate::core::models::ids::PeriodsId;
use crate::core::models::space::Space;
use crate::engine::conversion::{Conversion, ConversionSpec};

/// The space domain an operation lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Sited at a single location.
    Process,
    /// Spans a linkage between two locations.
    Transport,
}

impl OperationKind {
    /// Whether a space is of this operation's domain kind.
    pub fn accepts(self, space: Space) -> bool {
        match self {
            OperationKind::Process => space.is_location(),
            OperationKind::Transport => !space.is_location(),
        }
    }
}

/// A technology that interconverts commodities when operated.
///
/// An operation is inert until registered with a model; registration wires
/// its raw conversion specs into the operate conversion, resolves its aspect
/// slots, and hands out its [`OperationId`](crate::core::models::ids::OperationId).
/// All spatial bookkeeping (`spaces`, `capacity_spaces`, `space_times`) is
/// filled by the model's locate pass.
#[derive(Debug)]
pub struct Operation {
    pub(crate) name: String,
    pub(crate) kind: OperationKind,
    /// Raw user-supplied specs, folded in at registration.
    pub(crate) conversions: Vec<ConversionSpec>,
    pub(crate) operate: Option<Conversion>,
    pub(crate) capacity: Option<Conversion>,
    /// Spaces whose operate balance has been written.
    pub(crate) spaces: Vec<Space>,
    /// Spaces whose capacity balance has been written.
    pub(crate) capacity_spaces: Vec<Space>,
    /// Every (space, time) pair processed by locate, in order.
    pub(crate) space_times: Vec<(Space, PeriodsId)>,
    pub(crate) attached: bool,
    /// Aspect slots in the owning model, resolved once at registration.
    pub(crate) operate_aspect: Option<usize>,
    pub(crate) capacity_aspect: Option<usize>,
}

impl Operation {
    fn new(name: String, kind: OperationKind, conversions: Vec<ConversionSpec>) -> Self {
        Self {
            name,
            kind,
            conversions,
            operate: None,
            capacity: None,
            spaces: Vec::new(),
            capacity_spaces: Vec::new(),
            space_times: Vec::new(),
            attached: false,
            operate_aspect: None,
            capacity_aspect: None,
        }
    }

    /// A location-sited process with operate and capacity conversions.
    pub fn process(name: impl Into<String>, conversions: Vec<ConversionSpec>) -> Self {
        let name = name.into();
        let mut op = Self::new(name.clone(), OperationKind::Process, conversions);
        op.operate = Some(Conversion::operate(name.clone()));
        op.capacity = Some(Conversion::capacity(name));
        op
    }

    /// A linkage-spanning transport with operate and capacity conversions.
    pub fn transport(name: impl Into<String>, conversions: Vec<ConversionSpec>) -> Self {
        let name = name.into();
        let mut op = Self::new(name.clone(), OperationKind::Transport, conversions);
        op.operate = Some(Conversion::operate(name.clone()));
        op.capacity = Some(Conversion::capacity(name));
        op
    }

    /// An operation with no conversions wired. Legal to register and locate;
    /// locating it emits nothing.
    pub fn bare(name: impl Into<String>, conversions: Vec<ConversionSpec>) -> Self {
        Self::new(name.into(), OperationKind::Process, conversions)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn operate(&self) -> Option<&Conversion> {
        self.operate.as_ref()
    }

    pub fn capacity(&self) -> Option<&Conversion> {
        self.capacity.as_ref()
    }

    /// Spaces whose operate balance is already written, in write order.
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn space_times(&self) -> &[(Space, PeriodsId)] {
        &self.space_times
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::{LinkageId, LocationId};
    use slotmap::KeyData;

    #[test]
    fn kind_gates_space_domains() {
        let location = Space::Location(LocationId::from(KeyData::from_ffi(1)));
        let linkage = Space::Linkage(LinkageId::from(KeyData::from_ffi(1)));

        assert!(OperationKind::Process.accepts(location));
        assert!(!OperationKind::Process.accepts(linkage));
        assert!(OperationKind::Transport.accepts(linkage));
        assert!(!OperationKind::Transport.accepts(location));
    }

    #[test]
    fn bare_operations_carry_no_conversions() {
        let op = Operation::bare("placeholder", Vec::new());
        assert!(op.operate().is_none());
        assert!(op.capacity().is_none());
        assert!(!op.attached);
    }

    #[test]
    fn process_wires_both_conversions() {
        let op = Operation::process("boiler", Vec::new());
        assert!(op.operate().is_some());
        assert!(op.capacity().is_some());
        assert!(op.spaces().is_empty());
    }
}
