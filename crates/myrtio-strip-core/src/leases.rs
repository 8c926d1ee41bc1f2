//! DHCP lease bookkeeping used to count attached stations.

use heapless::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lease {
    mac: [u8; 6],
    expires_at_ms: u64,
}

/// Acknowledged leases keyed by client MAC, at most `N` at once.
///
/// `N` is the access point's station limit: a new client evicts the lease
/// closest to expiry, so the count never exceeds what the radio admits.
#[derive(Debug)]
pub struct LeaseTable<const N: usize> {
    leases: Vec<Lease, N>,
    lease_ms: u64,
}

impl<const N: usize> LeaseTable<N> {
    pub const fn new(lease_ms: u64) -> Self {
        Self {
            leases: Vec::new(),
            lease_ms,
        }
    }

    /// Record an acknowledged lease at `now_ms`.
    pub fn renew(&mut self, mac: [u8; 6], now_ms: u64) {
        let expires_at_ms = now_ms.saturating_add(self.lease_ms);
        if let Some(lease) = self.leases.iter_mut().find(|lease| lease.mac == mac) {
            lease.expires_at_ms = expires_at_ms;
            return;
        }
        if self.leases.is_full() {
            let oldest = self
                .leases
                .iter()
                .enumerate()
                .min_by_key(|(_, lease)| lease.expires_at_ms)
                .map(|(i, _)| i);
            if let Some(oldest) = oldest {
                self.leases.swap_remove(oldest);
            }
        }
        let _ = self.leases.push(Lease { mac, expires_at_ms });
    }

    pub fn release(&mut self, mac: [u8; 6]) {
        self.leases.retain(|lease| lease.mac != mac);
    }

    /// Forget every lease, e.g. after the radio dropped all stations.
    pub fn clear(&mut self) {
        self.leases.clear();
    }

    /// Drop expired leases and return how many remain.
    pub fn active(&mut self, now_ms: u64) -> usize {
        self.leases.retain(|lease| lease.expires_at_ms > now_ms);
        self.leases.len()
    }
}
