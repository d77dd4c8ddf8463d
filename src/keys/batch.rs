use std::thread;
use chrono::Local;
use crossbeam_channel::{bounded, Receiver, Sender};
use indicatif::{ProgressBar, ProgressStyle};
use crate::config::silent;
use crate::keys::{Key, KeyError, KeyType};

/// Generate `count` independent keys on `threads` workers, returned in index order.
///
/// Each worker draws from its own thread-local random source. Any failed
/// generation fails the whole batch. Progress output follows the global silent flag.
pub fn generate_batch(key_type: KeyType, count: usize, threads: usize) -> Result<Vec<Key>, KeyError> {
    if count == 0 { return Ok(Vec::new()); }
    let silent = silent();
    let threads = threads.clamp(1, count);
    let start = Local::now().timestamp_millis();
    // both queues hold the whole batch so neither side ever blocks the other
    let (map_tx, map_rx): (Sender<usize>, Receiver<usize>) = bounded(count);
    let (reduce_tx, reduce_rx): (Sender<(usize, Result<Key, KeyError>)>, Receiver<(usize, Result<Key, KeyError>)>) = bounded(count);
    for index in 0..count {
        map_tx.send(index).map_err(|e| KeyError::Generate(e.to_string()))?;
    }
    drop(map_tx);
    let pb = match silent {
        true => None,
        false => Some(ProgressBar::new(count as u64)),
    };
    if let Some(pb) = &pb {
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} keys ({eta})") {
            pb.set_style(style.progress_chars("#>-"));
        }
    }
    let handles = (0..threads).map(|_i| {
        let r = map_rx.clone();
        let s = reduce_tx.clone();
        thread::spawn(move || {
            while let Ok(index) = r.recv() {
                if s.send((index, Key::generate(key_type))).is_err() { break; }
            }
        })
    }).collect::<Vec<_>>();
    drop(reduce_tx);
    let mut res_collect = Vec::with_capacity(count);
    for r in reduce_rx.iter() {
        res_collect.push(r);
        if let Some(pb) = &pb { pb.inc(1); }
    }
    for handle in handles {
        handle.join().map_err(|_| KeyError::Generate("generator thread panicked".to_string()))?;
    }
    if let Some(pb) = &pb { pb.finish_with_message("Done"); }
    if res_collect.len() != count {
        return Err(KeyError::Generate(format!("expected {} keys, got {}", count, res_collect.len())));
    }
    res_collect.sort_by_key(|r| r.0);
    let keys = res_collect.into_iter().map(|r| r.1).collect::<Result<Vec<_>, _>>()?;
    if !silent {
        println!("Done generation of {} {} keys in {} ms", count, key_type, Local::now().timestamp_millis() - start);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::error::Error;
    use crate::config::{init_silent, silent};
    use crate::keys::{generate_batch, KeyType};

    #[test]
    fn test_batch_elliptic() -> Result<(), Box<dyn Error>> {
        let keys = generate_batch(KeyType::Elliptic, 10, 3)?;
        assert_eq!(keys.len(), 10);
        let pems = keys.iter().map(|k| k.private_pem().to_string()).collect::<HashSet<_>>();
        assert_eq!(pems.len(), 10);
        assert!(keys.iter().all(|k| k.key_type() == KeyType::Elliptic));
        Ok(())
    }

    #[test]
    fn test_batch_rsa() -> Result<(), Box<dyn Error>> {
        let keys = generate_batch(KeyType::Rsa, 2, 8)?;
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0].private_pem(), keys[1].private_pem());
        Ok(())
    }

    #[test]
    fn test_batch_silenced() -> Result<(), Box<dyn Error>> {
        init_silent(true);
        assert!(silent());
        assert_eq!(generate_batch(KeyType::Elliptic, 3, 2)?.len(), 3);
        Ok(())
    }

    #[test]
    fn test_batch_empty() -> Result<(), Box<dyn Error>> {
        assert!(generate_batch(KeyType::Elliptic, 0, 4)?.is_empty());
        assert_eq!(generate_batch(KeyType::Elliptic, 1, 0)?.len(), 1);
        Ok(())
    }
}
