/// Element shapes with a sub-control-volume master element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangle3,
    Quadrilateral4,
    Tetrahedron4,
    Hexahedron8,
}

impl Topology {
    pub fn num_nodes(&self) -> usize {
        match self {
            Topology::Triangle3 => 3,
            Topology::Quadrilateral4 => 4,
            Topology::Tetrahedron4 => 4,
            Topology::Hexahedron8 => 8,
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            Topology::Triangle3 | Topology::Quadrilateral4 => 2,
            Topology::Tetrahedron4 | Topology::Hexahedron8 => 3,
        }
    }
}

/// Geometric quantities a kernel may ask the master element to compute per element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MasterElementCall {
    /// Sub-control-volume measures, one per volume integration point.
    ScvVolume,
}
