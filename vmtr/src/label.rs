use strum::Display;

/// Kinds of generated labels. The display form is the label prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Fresh {
    EQ,
    GT,
    LT,
    #[strum(to_string = "FUNCTION_INIT")]
    Init,
    RET,
}

/// Program-wide label counters. Never reset between units or functions.
#[derive(Debug, Default)]
pub struct Labels {
    compare: usize,
    ret: usize,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a label no other call has returned for this `Labels`.
    pub fn fresh(&mut self, kind: Fresh) -> String {
        let n = match kind {
            Fresh::RET => {
                self.ret += 1;
                self.ret
            }
            Fresh::EQ | Fresh::GT | Fresh::LT | Fresh::Init => {
                self.compare += 1;
                self.compare
            }
        };
        format!("${}.{}", kind, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn counters_are_independent() {
        let mut labels = Labels::new();
        assert_eq!(labels.fresh(Fresh::EQ), "$EQ.1");
        assert_eq!(labels.fresh(Fresh::RET), "$RET.1");
        assert_eq!(labels.fresh(Fresh::GT), "$GT.2");
        assert_eq!(labels.fresh(Fresh::Init), "$FUNCTION_INIT.3");
        assert_eq!(labels.fresh(Fresh::RET), "$RET.2");
    }

    #[test]
    fn never_repeats() {
        let mut labels = Labels::new();
        let kinds = [Fresh::EQ, Fresh::GT, Fresh::LT, Fresh::Init, Fresh::RET];
        let mut seen = HashSet::new();
        for i in 0..500 {
            assert!(seen.insert(labels.fresh(kinds[i % kinds.len()])));
        }
    }
}
