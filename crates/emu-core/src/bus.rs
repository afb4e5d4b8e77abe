//! Memory and I/O bus interface.

use std::collections::HashMap;

use crate::BusError;

/// Memory and I/O bus interface.
///
/// CPUs never call `read`/`write` directly; they go through
/// [`Clock`](crate::Clock) so that every access costs exactly one bus cycle.
/// `peek`/`poke` are zero-cycle inspection for test setup and debuggers.
pub trait Bus {
    /// Read a byte during a bus cycle.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte during a bus cycle.
    fn write(&mut self, address: u16, value: u8);

    /// Inspect a byte without side effects.
    fn peek(&self, address: u16) -> u8;

    /// Inject a byte without side effects, ignoring access levels.
    fn poke(&mut self, address: u16, value: u8);

    /// Read from I/O port space.
    fn io_read(&mut self, port: u16) -> u8 {
        let _ = port;
        0xFF
    }

    /// Write to I/O port space.
    fn io_write(&mut self, port: u16, value: u8) {
        let _ = (port, value);
    }
}

/// Access level of a mapped region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// A contiguous block of the address space with its own backing storage.
#[derive(Debug, Clone)]
pub struct Region {
    name: &'static str,
    base: u16,
    access: Access,
    data: Vec<u8>,
}

impl Region {
    /// A zero-filled region.
    #[must_use]
    pub fn new(name: &'static str, base: u16, access: Access, size: usize) -> Self {
        Self::with_data(name, base, access, vec![0; size])
    }

    /// A region backed by existing contents (e.g. a ROM image).
    #[must_use]
    pub fn with_data(name: &'static str, base: u16, access: Access, data: Vec<u8>) -> Self {
        Self {
            name,
            base,
            access,
            data,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn base(&self) -> u16 {
        self.base
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn access(&self) -> Access {
        self.access
    }

    /// One past the last address, as a 32-bit value so $FFFF-ending regions fit.
    fn end(&self) -> u32 {
        u32::from(self.base) + self.data.len() as u32
    }
}

/// A decoded address space made of non-overlapping regions plus a port latch file.
///
/// Accesses outside every region are a configuration defect and panic.
/// Writes to read-only regions are dropped; reads from write-only regions
/// return the last value seen on the data bus.
#[derive(Debug, Clone, Default)]
pub struct MemoryMap {
    regions: Vec<Region>,
    ports: HashMap<u16, u8>,
    data_bus: u8,
}

impl MemoryMap {
    /// An empty map. Every access panics until regions are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 64K of read/write RAM covering the whole address space.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            regions: vec![Region::new("ram", 0x0000, Access::ReadWrite, 0x1_0000)],
            ..Self::default()
        }
    }

    /// Add a region. Fails if it is empty, runs off the end of the address
    /// space or overlaps an existing region.
    pub fn map(&mut self, region: Region) -> Result<(), BusError> {
        if region.is_empty() {
            return Err(BusError::Empty { name: region.name });
        }
        if region.end() > 0x1_0000 {
            return Err(BusError::OutOfRange {
                name: region.name,
                base: region.base,
                size: region.len(),
            });
        }
        if let Some(other) = self
            .regions
            .iter()
            .find(|r| u32::from(region.base) < r.end() && u32::from(r.base) < region.end())
        {
            return Err(BusError::Overlap {
                name: region.name,
                base: region.base,
                other: other.name,
            });
        }

        log::debug!(
            "mapped {} at ${:04X}-${:04X} ({:?})",
            region.name,
            region.base,
            region.end() - 1,
            region.access
        );
        let index = self.regions.partition_point(|r| r.base < region.base);
        self.regions.insert(index, region);
        Ok(())
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Find the region and offset claiming an address.
    pub fn decode(&self, address: u16) -> Result<(usize, usize), BusError> {
        let index = self.regions.partition_point(|r| r.base <= address);
        let region = index
            .checked_sub(1)
            .and_then(|i| self.regions.get(i).map(|r| (i, r)))
            .filter(|(_, r)| u32::from(address) < r.end());
        match region {
            Some((i, r)) => Ok((i, usize::from(address - r.base))),
            None => Err(BusError::Unmapped { address }),
        }
    }

    fn locate(&self, address: u16) -> (usize, usize) {
        self.decode(address).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Copy bytes into the map starting at `address`, ignoring access levels.
    pub fn load(&mut self, address: u16, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.poke(address.wrapping_add(i as u16), byte);
        }
    }

    /// Latch the value the next `io_read` of `port` returns.
    pub fn set_port(&mut self, port: u16, value: u8) {
        self.ports.insert(port, value);
    }

    /// The value last written to (or latched for) a port.
    #[must_use]
    pub fn port(&self, port: u16) -> Option<u8> {
        self.ports.get(&port).copied()
    }
}

impl Bus for MemoryMap {
    fn read(&mut self, address: u16) -> u8 {
        let (index, offset) = self.locate(address);
        let region = &self.regions[index];
        if region.access == Access::WriteOnly {
            log::trace!("open-bus read of write-only {} at ${address:04X}", region.name);
        } else {
            self.data_bus = region.data[offset];
        }
        self.data_bus
    }

    fn write(&mut self, address: u16, value: u8) {
        let (index, offset) = self.locate(address);
        self.data_bus = value;
        let region = &mut self.regions[index];
        if region.access == Access::ReadOnly {
            log::trace!("ignored write ${value:02X} to read-only {} at ${address:04X}", region.name);
        } else {
            region.data[offset] = value;
        }
    }

    fn peek(&self, address: u16) -> u8 {
        let (index, offset) = self.locate(address);
        self.regions[index].data[offset]
    }

    fn poke(&mut self, address: u16, value: u8) {
        let (index, offset) = self.locate(address);
        self.regions[index].data[offset] = value;
    }

    fn io_read(&mut self, port: u16) -> u8 {
        self.data_bus = self.ports.get(&port).copied().unwrap_or(0xFF);
        self.data_bus
    }

    fn io_write(&mut self, port: u16, value: u8) {
        self.data_bus = value;
        self.ports.insert(port, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_and_ram() -> MemoryMap {
        let mut map = MemoryMap::new();
        map.map(Region::new("ram", 0x0000, Access::ReadWrite, 0x8000))
            .expect("ram maps");
        map.map(Region::with_data(
            "rom",
            0xC000,
            Access::ReadOnly,
            vec![0xEA; 0x4000],
        ))
        .expect("rom maps");
        map
    }

    #[test]
    fn decode_finds_owning_region() {
        let map = rom_and_ram();
        assert_eq!(map.decode(0x0000), Ok((0, 0)));
        assert_eq!(map.decode(0x7FFF), Ok((0, 0x7FFF)));
        assert_eq!(map.decode(0xFFFF), Ok((1, 0x3FFF)));
        assert_eq!(
            map.decode(0x8000),
            Err(BusError::Unmapped { address: 0x8000 })
        );
    }

    #[test]
    fn overlapping_region_is_rejected() {
        let mut map = rom_and_ram();
        let err = map
            .map(Region::new("io", 0x7F00, Access::ReadWrite, 0x200))
            .unwrap_err();
        assert_eq!(
            err,
            BusError::Overlap {
                name: "io",
                base: 0x7F00,
                other: "ram"
            }
        );
    }

    #[test]
    fn region_past_top_of_memory_is_rejected() {
        let mut map = MemoryMap::new();
        let err = map
            .map(Region::new("big", 0xFF00, Access::ReadWrite, 0x200))
            .unwrap_err();
        assert!(matches!(err, BusError::OutOfRange { .. }));
        assert!(matches!(
            map.map(Region::new("none", 0, Access::ReadWrite, 0)),
            Err(BusError::Empty { name: "none" })
        ));
    }

    #[test]
    fn rom_ignores_writes() {
        let mut map = rom_and_ram();
        map.write(0xC000, 0x00);
        assert_eq!(map.read(0xC000), 0xEA);
    }

    #[test]
    fn write_only_reads_open_bus() {
        let mut map = MemoryMap::new();
        map.map(Region::new("ram", 0x0000, Access::ReadWrite, 0x100))
            .expect("ram maps");
        map.map(Region::new("latch", 0x0100, Access::WriteOnly, 1))
            .expect("latch maps");
        map.poke(0x0010, 0x5A);
        map.write(0x0100, 0x33);
        assert_eq!(map.peek(0x0100), 0x33);
        assert_eq!(map.read(0x0010), 0x5A);
        assert_eq!(map.read(0x0100), 0x5A);
    }

    #[test]
    #[should_panic(expected = "unmapped address $9000")]
    fn unmapped_read_is_fatal() {
        let mut map = rom_and_ram();
        let _ = map.read(0x9000);
    }

    #[test]
    fn ports_latch_values() {
        let mut map = MemoryMap::flat();
        assert_eq!(map.io_read(0x1010), 0xFF);
        map.set_port(0x1010, 0x42);
        assert_eq!(map.io_read(0x1010), 0x42);
        map.io_write(0x2020, 0x99);
        assert_eq!(map.port(0x2020), Some(0x99));
    }
}
