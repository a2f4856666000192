//! Mesh addresses and network prefixes
//!
//! Every peer in the DoDAG is identified by a 128-bit network-layer address.
//! The upstream relay is reported with its leading bits overwritten by the
//! topology's own prefix, so the rendered parent address is the one reachable
//! inside the mesh rather than the raw next-hop the routing layer stores.

use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

/// 128-bit network-layer address of a mesh peer
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshAddr(Ipv6Addr);

impl MeshAddr {
    pub const UNSPECIFIED: MeshAddr = MeshAddr(Ipv6Addr::UNSPECIFIED);

    #[inline]
    pub fn new(addr: Ipv6Addr) -> Self {
        MeshAddr(addr)
    }

    #[inline]
    pub fn octets(self) -> [u8; 16] {
        self.0.octets()
    }

    #[inline]
    pub fn from_octets(octets: [u8; 16]) -> Self {
        MeshAddr(Ipv6Addr::from(octets))
    }

    /// Standard textual form, used verbatim in the topology document
    pub fn to_text(self) -> String {
        self.0.to_string()
    }
}

impl Default for MeshAddr {
    fn default() -> Self {
        MeshAddr::UNSPECIFIED
    }
}

impl From<Ipv6Addr> for MeshAddr {
    fn from(addr: Ipv6Addr) -> Self {
        MeshAddr(addr)
    }
}

impl FromStr for MeshAddr {
    type Err = std::net::AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MeshAddr(s.parse()?))
    }
}

impl fmt::Debug for MeshAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Addr({})", self.0)
    }
}

impl fmt::Display for MeshAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network prefix of the local topology
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    addr: MeshAddr,
    len: u8,
}

impl Prefix {
    /// Create a prefix; lengths beyond 128 bits are clamped
    pub fn new(addr: MeshAddr, len: u8) -> Self {
        Prefix {
            addr,
            len: len.min(128),
        }
    }

    #[inline]
    pub fn addr(self) -> MeshAddr {
        self.addr
    }

    #[inline]
    pub fn len(self) -> u8 {
        self.len
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Overwrite the leading `len` bits of `target` with this prefix
    pub fn apply(self, target: MeshAddr) -> MeshAddr {
        let prefix = self.addr.octets();
        let mut out = target.octets();

        let full = (self.len / 8) as usize;
        out[..full].copy_from_slice(&prefix[..full]);

        let rem = self.len % 8;
        if rem > 0 {
            let mask = 0xFFu8 << (8 - rem);
            out[full] = (prefix[full] & mask) | (out[full] & !mask);
        }

        MeshAddr::from_octets(out)
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Prefix::new(MeshAddr::UNSPECIFIED, 0)
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefix({}/{})", self.addr, self.len)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}
