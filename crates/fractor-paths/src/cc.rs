//! Connected-component labelling.

use fractor_core::Point;

use crate::PathRange;
use crate::traits::Pather;

impl PathRange {
    /// Label every cell accepted by `keep` with a connected-component id.
    ///
    /// Two kept cells belong to the same component if a chain of neighbours
    /// (as defined by `pather`) joins them. Returns the number of components.
    /// Use [`cc_at`](Self::cc_at) to query the label of a point afterwards.
    pub fn cc_map_all<P: Pather>(&mut self, pather: &P, keep: impl Fn(Point) -> bool) -> usize {
        let len = self.rng.len();
        for v in self.cc_labels.iter_mut() {
            *v = -1;
        }

        let mut label: i32 = 0;
        let mut nbuf = std::mem::take(&mut self.nbuf);

        for start in 0..len {
            if self.cc_labels[start] >= 0 || !keep(self.point(start)) {
                continue;
            }

            // Iterative DFS from `start`.
            self.cc_stack.clear();
            self.cc_stack.push(start);
            self.cc_labels[start] = label;

            while let Some(ci) = self.cc_stack.pop() {
                let cp = self.point(ci);
                nbuf.clear();
                pather.neighbors(cp, &mut nbuf);

                for &np in nbuf.iter() {
                    if !keep(np) {
                        continue;
                    }
                    if let Some(ni) = self.idx(np) {
                        if self.cc_labels[ni] < 0 {
                            self.cc_labels[ni] = label;
                            self.cc_stack.push(ni);
                        }
                    }
                }
            }

            label += 1;
        }

        self.nbuf = nbuf;
        label as usize
    }

    /// Connected-component label of a point from the last labelling query,
    /// or `None` if the point is outside the range or was not labelled.
    pub fn cc_at(&self, p: Point) -> Option<usize> {
        let i = self.idx(p)?;
        let label = self.cc_labels[i];
        if label < 0 { None } else { Some(label as usize) }
    }
}
