//! Channel topology connecting the workers of one run.
//!
//! Every adjacent pair of bands gets one duplex row channel per
//! direction; the termination ring connects all ranks in order, wrapping
//! from the last back to rank 0. All channels are unbounded, so the
//! symmetric send-both-then-receive-both exchange pattern cannot
//! deadlock.

use crossbeam_channel::{unbounded, Receiver, Sender};
use talweg_core::cell::RowBuf;
use talweg_core::{CellValue, Rank};

use crate::band::{Band, Edge};
use crate::error::{ExchangeError, GridError};

/// Termination-ring message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TermToken {
    /// Accumulating AND of local done flags, traveling rank 0 -> 1 -> ...
    Probe(bool),
    /// The agreed verdict, broadcast around the ring by rank 0.
    Verdict(bool),
}

/// One direction of a neighbor boundary.
#[derive(Debug)]
pub(crate) struct Duplex {
    pub(crate) tx: Sender<RowBuf>,
    pub(crate) rx: Receiver<RowBuf>,
}

/// All channels a single worker holds: links to its band neighbors and
/// its slot in the termination ring.
///
/// Built by [`wire_links`]; one bundle per rank, moved into the worker's
/// thread. A single-worker run has no channels at all and every exchange
/// operation degenerates to a no-op.
#[derive(Debug)]
pub struct GridLinks {
    pub(crate) rank: Rank,
    pub(crate) size: u32,
    pub(crate) up: Option<Duplex>,
    pub(crate) down: Option<Duplex>,
    pub(crate) ring_tx: Option<Sender<TermToken>>,
    pub(crate) ring_rx: Option<Receiver<TermToken>>,
}

impl GridLinks {
    /// Rank this bundle belongs to.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Number of workers wired together.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn disconnected(&self) -> ExchangeError {
        ExchangeError::Disconnected { rank: self.rank }
    }

    /// Refresh both halo rows of `band` with the neighbors' edge rows.
    ///
    /// Collective: every worker must call this on the same layer in the
    /// same order. Halo rows without a neighbor are left untouched.
    pub fn share<T: CellValue>(&self, band: &mut Band<T>) -> Result<(), ExchangeError> {
        if let Some(up) = &self.up {
            up.tx
                .send(T::wrap_row(band.edge_row(Edge::Top)))
                .map_err(|_| self.disconnected())?;
        }
        if let Some(down) = &self.down {
            down.tx
                .send(T::wrap_row(band.edge_row(Edge::Bottom)))
                .map_err(|_| self.disconnected())?;
        }
        if let Some(up) = &self.up {
            let row = up.rx.recv().map_err(|_| self.disconnected())?;
            band.install_halo(Edge::Top, T::unwrap_row(row)?)?;
        }
        if let Some(down) = &self.down {
            let row = down.rx.recv().map_err(|_| self.disconnected())?;
            band.install_halo(Edge::Bottom, T::unwrap_row(row)?)?;
        }
        Ok(())
    }

    /// Swap halo delta buffers with the neighbors and fold the received
    /// deltas into the band's edge rows.
    ///
    /// After the call each halo row holds the deltas the neighbor sent,
    /// so callers can still inspect which columns were touched. Collective
    /// in the same sense as [`GridLinks::share`].
    pub fn add_borders<T: CellValue>(&self, band: &mut Band<T>) -> Result<(), ExchangeError> {
        if let Some(up) = &self.up {
            up.tx
                .send(T::wrap_row(band.halo_copy(Edge::Top)))
                .map_err(|_| self.disconnected())?;
        }
        if let Some(down) = &self.down {
            down.tx
                .send(T::wrap_row(band.halo_copy(Edge::Bottom)))
                .map_err(|_| self.disconnected())?;
        }
        if let Some(up) = &self.up {
            let row = up.rx.recv().map_err(|_| self.disconnected())?;
            band.install_halo(Edge::Top, T::unwrap_row(row)?)?;
            band.fold_halo(Edge::Top);
        }
        if let Some(down) = &self.down {
            let row = down.rx.recv().map_err(|_| self.disconnected())?;
            band.install_halo(Edge::Bottom, T::unwrap_row(row)?)?;
            band.fold_halo(Edge::Bottom);
        }
        Ok(())
    }

    /// Global AND-reduction of `local_done` with a consistent verdict.
    ///
    /// Two trips around the ring: rank 0 seeds a probe with its own flag,
    /// every rank folds its flag in and forwards, then rank 0 broadcasts
    /// the verdict back around. Called only at the synchronized point
    /// after all exchanges of a round are folded, so no late decrement can
    /// invalidate a true verdict.
    pub fn ring_term(&self, local_done: bool) -> Result<bool, ExchangeError> {
        let (tx, rx) = match (&self.ring_tx, &self.ring_rx) {
            (Some(tx), Some(rx)) => (tx, rx),
            _ => return Ok(local_done),
        };
        if self.rank.0 == 0 {
            tx.send(TermToken::Probe(local_done))
                .map_err(|_| self.disconnected())?;
            let verdict = match rx.recv().map_err(|_| self.disconnected())? {
                TermToken::Probe(acc) => acc,
                TermToken::Verdict(_) => {
                    return Err(ExchangeError::Protocol {
                        rank: self.rank,
                        expected: "probe",
                    })
                }
            };
            tx.send(TermToken::Verdict(verdict))
                .map_err(|_| self.disconnected())?;
            match rx.recv().map_err(|_| self.disconnected())? {
                TermToken::Verdict(_) => Ok(verdict),
                TermToken::Probe(_) => Err(ExchangeError::Protocol {
                    rank: self.rank,
                    expected: "verdict",
                }),
            }
        } else {
            let acc = match rx.recv().map_err(|_| self.disconnected())? {
                TermToken::Probe(acc) => acc,
                TermToken::Verdict(_) => {
                    return Err(ExchangeError::Protocol {
                        rank: self.rank,
                        expected: "probe",
                    })
                }
            };
            tx.send(TermToken::Probe(acc && local_done))
                .map_err(|_| self.disconnected())?;
            let verdict = match rx.recv().map_err(|_| self.disconnected())? {
                TermToken::Verdict(v) => v,
                TermToken::Probe(_) => {
                    return Err(ExchangeError::Protocol {
                        rank: self.rank,
                        expected: "verdict",
                    })
                }
            };
            tx.send(TermToken::Verdict(verdict))
                .map_err(|_| self.disconnected())?;
            Ok(verdict)
        }
    }
}

/// Wire up the channel bundles for `size` workers.
///
/// Returns one [`GridLinks`] per rank, in rank order.
pub fn wire_links(size: u32) -> Result<Vec<GridLinks>, GridError> {
    if size == 0 {
        return Err(GridError::TooManyWorkers {
            workers: 0,
            rows: 0,
        });
    }
    let n = size as usize;
    let mut ups: Vec<Option<Duplex>> = (0..n).map(|_| None).collect();
    let mut downs: Vec<Option<Duplex>> = (0..n).map(|_| None).collect();
    for upper in 0..n.saturating_sub(1) {
        let lower = upper + 1;
        let (down_tx, down_rx) = unbounded();
        let (up_tx, up_rx) = unbounded();
        downs[upper] = Some(Duplex {
            tx: down_tx,
            rx: up_rx,
        });
        ups[lower] = Some(Duplex {
            tx: up_tx,
            rx: down_rx,
        });
    }

    let mut ring_txs: Vec<Option<Sender<TermToken>>> = (0..n).map(|_| None).collect();
    let mut ring_rxs: Vec<Option<Receiver<TermToken>>> = (0..n).map(|_| None).collect();
    if n > 1 {
        for from in 0..n {
            let to = (from + 1) % n;
            let (tx, rx) = unbounded();
            ring_txs[from] = Some(tx);
            ring_rxs[to] = Some(rx);
        }
    }

    let mut links = Vec::with_capacity(n);
    for (rank, ((up, down), (ring_tx, ring_rx))) in ups
        .into_iter()
        .zip(downs)
        .zip(ring_txs.into_iter().zip(ring_rxs))
        .enumerate()
    {
        links.push(GridLinks {
            rank: Rank(rank as u32),
            size,
            up,
            down,
            ring_tx,
            ring_rx,
        });
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::BandDecomposition;
    use std::thread;

    fn bands_for<T: CellValue>(
        total: u32,
        cols: u32,
        size: u32,
        nodata: T,
        fill: T,
    ) -> Vec<Band<T>> {
        BandDecomposition::new(total, cols, size)
            .unwrap()
            .geometries()
            .into_iter()
            .map(|geo| Band::filled(geo, nodata, fill))
            .collect()
    }

    // ── Wiring ──

    #[test]
    fn single_worker_has_no_channels() {
        let links = wire_links(1).unwrap();
        assert_eq!(links.len(), 1);
        assert!(links[0].up.is_none());
        assert!(links[0].down.is_none());
        assert!(links[0].ring_tx.is_none());
        assert_eq!(links[0].ring_term(true).unwrap(), true);
        assert_eq!(links[0].ring_term(false).unwrap(), false);
    }

    #[test]
    fn interior_ranks_have_both_neighbors() {
        let links = wire_links(3).unwrap();
        assert!(links[0].up.is_none() && links[0].down.is_some());
        assert!(links[1].up.is_some() && links[1].down.is_some());
        assert!(links[2].up.is_some() && links[2].down.is_none());
    }

    // ── Share ──

    #[test]
    fn share_mirrors_neighbor_edge_rows() {
        let links = wire_links(3).unwrap();
        let mut bands = bands_for(6, 2, 3, -9999i32, 0);
        for (rank, band) in bands.iter_mut().enumerate() {
            let rows = band.geometry().rows();
            for r in 0..rows {
                let v = (rank * 10 + r as usize) as i32;
                band.set(r as i32, 0, v);
                band.set(r as i32, 1, v);
            }
        }
        let handles: Vec<_> = links
            .into_iter()
            .zip(bands)
            .map(|(links, mut band)| {
                thread::spawn(move || {
                    links.share(&mut band).unwrap();
                    band
                })
            })
            .collect();
        let bands: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Rank 1's top halo is rank 0's last row; its bottom halo is rank
        // 2's first row.
        assert_eq!(bands[1].get(-1, 0), 1);
        assert_eq!(bands[1].get(bands[1].geometry().rows() as i32, 0), 20);
        // Rank 0's top halo has no neighbor and stays nodata.
        assert_eq!(bands[0].get(-1, 0), -9999);
        // Rank 2's top halo is rank 1's last row.
        assert_eq!(bands[2].get(-1, 1), 11);
    }

    #[test]
    fn share_of_mismatched_layers_reports_kind_error() {
        let links = wire_links(2).unwrap();
        let mut links_iter = links.into_iter();
        let links_a = links_iter.next().unwrap();
        let links_b = links_iter.next().unwrap();
        let mut short_bands = bands_for(2, 2, 2, i16::MIN, 1i16);
        let mut float_bands = bands_for(2, 2, 2, -f32::MAX, 1.0f32);
        let mut short_a = short_bands.remove(0);
        let mut float_b = float_bands.remove(1);
        let a = thread::spawn(move || links_a.share(&mut short_a));
        let b = thread::spawn(move || links_b.share(&mut float_b));
        let ra = a.join().unwrap();
        let rb = b.join().unwrap();
        assert!(matches!(ra, Err(ExchangeError::RowKind(_))));
        assert!(matches!(rb, Err(ExchangeError::RowKind(_))));
    }

    // ── Border folding ──

    #[test]
    fn add_borders_folds_deltas_across_the_boundary() {
        let links = wire_links(2).unwrap();
        let mut bands = bands_for(4, 2, 2, i16::MIN, 1i16);
        for band in &mut bands {
            band.clear_halos();
        }
        // Rank 0 decrements a cell it sees at its bottom halo, which is
        // rank 1's local row 0, column 1.
        let band0_rows = bands[0].geometry().rows() as i32;
        bands[0].add_to(band0_rows, 1, -1);
        let handles: Vec<_> = links
            .into_iter()
            .zip(bands)
            .map(|(links, mut band)| {
                thread::spawn(move || {
                    links.add_borders(&mut band).unwrap();
                    band
                })
            })
            .collect();
        let bands: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(bands[1].get(0, 1), 0);
        assert_eq!(bands[1].get(0, 0), 1);
        // The received delta stays readable in the halo buffer.
        assert_eq!(bands[1].halo(Edge::Top), &[0, -1]);
        // Rank 0 received an all-zero buffer and its edge rows are intact.
        assert_eq!(bands[0].get(0, 0), 1);
        assert_eq!(bands[0].get(1, 1), 1);
    }

    // ── Ring termination ──

    fn ring_verdict(flags: &[bool]) -> Vec<bool> {
        let links = wire_links(flags.len() as u32).unwrap();
        let handles: Vec<_> = links
            .into_iter()
            .zip(flags.to_vec())
            .map(|(links, flag)| thread::spawn(move || links.ring_term(flag).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test]
    fn ring_term_is_unanimous_and_consistent() {
        assert_eq!(ring_verdict(&[true, true, true]), vec![true, true, true]);
        assert_eq!(
            ring_verdict(&[true, false, true]),
            vec![false, false, false]
        );
        assert_eq!(ring_verdict(&[false, true]), vec![false, false]);
        assert_eq!(ring_verdict(&[true, true]), vec![true, true]);
    }

    #[test]
    fn ring_term_repeats_across_rounds() {
        let links = wire_links(2).unwrap();
        let handles: Vec<_> = links
            .into_iter()
            .map(|links| {
                thread::spawn(move || {
                    let first = links.ring_term(false).unwrap();
                    let second = links.ring_term(true).unwrap();
                    (first, second)
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), (false, true));
        }
    }

    #[test]
    fn disconnecting_a_neighbor_surfaces_an_error() {
        let links = wire_links(2).unwrap();
        let mut links_iter = links.into_iter();
        let links_a = links_iter.next().unwrap();
        drop(links_iter); // rank 1 vanishes
        let mut band = bands_for(2, 2, 2, 0i32, 0).remove(0);
        assert!(matches!(
            links_a.share(&mut band),
            Err(ExchangeError::Disconnected { .. })
        ));
    }
}
