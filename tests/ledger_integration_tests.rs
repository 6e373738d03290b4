//! Ledger integration tests
//!
//! Walks the full election lifecycle through blocks and the chain: calling
//! elections, voting, tallying, mining, and validating the linked history.

use ballotchain::core::{Block, Chain, Elections, Entry, EntryKind, Transaction, TransactionInput};
use ballotchain::Account;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn elections_of(transaction: &Transaction) -> Elections {
    match transaction.data() {
        Entry::Elections(elections) => elections.clone(),
        _ => panic!("expected an elections transaction"),
    }
}

#[test]
fn test_full_election_lifecycle_in_one_block() {
    init_logging();
    let caller = Account::new().unwrap();
    let voter = Account::new().unwrap();
    let teller = Account::new().unwrap();

    let mut block = Block::new("0", "v1", 1, Vec::new());

    let elections_tx = caller
        .create_elections("Best lunch?", vec!["pizza".to_string(), "salad".to_string()])
        .unwrap();
    let elections = elections_of(&elections_tx);
    block.add_transaction(elections_tx);
    assert_eq!(1, block.get_open_elections(None).len());

    // Vote in the open elections, consuming their output
    let elections_output = block.get_open_elections(None)[0].clone();
    let vote_tx = voter
        .vote(
            "salad",
            &elections,
            vec![TransactionInput::from_output(elections_output.clone())],
        )
        .unwrap();
    block.add_transaction(vote_tx);

    assert!(block.get_open_elections(None).is_empty());
    let vote_outputs = block.authored_by_of_kind(voter.public_key(), EntryKind::Vote);
    assert_eq!(1, vote_outputs.len());
    let vote_output = vote_outputs[0].clone();

    // The tally transaction references the already consumed elections
    // output, so the block silently drops it and the pool is unchanged
    let tally_tx = teller
        .tally(vec![
            TransactionInput::from_output(elections_output),
            TransactionInput::from_output(vote_output),
        ])
        .unwrap();
    let pool_size = block.unconsumed_outputs().len();
    let accepted = block.transactions().len();
    block.add_transaction(tally_tx.clone());
    assert_eq!(pool_size, block.unconsumed_outputs().len());
    assert_eq!(accepted, block.transactions().len());

    // The tally itself still validated and counts the votes
    assert!(tally_tx.validate());
    let tally = match tally_tx.data() {
        Entry::Tally(tally) => tally.clone(),
        _ => panic!("expected a tally transaction"),
    };
    let summary = tally.summary().unwrap();
    assert_eq!(vec!["Best lunch?".to_string()], summary["question"]);
    assert_eq!(vec!["0".to_string(), "1".to_string()], summary["voteCounts"]);

    block.mine_hash();
    assert!(block.hash().starts_with('0'));
    assert!(block.is_block_valid());
}

#[test]
fn test_pool_carries_across_blocks() {
    init_logging();
    let caller = Account::new().unwrap();
    let voter = Account::new().unwrap();

    let mut genesis_block = Block::new("0", "v1", 1, Vec::new());
    let elections_tx = caller
        .create_elections("Q", vec!["a1".to_string(), "a2".to_string()])
        .unwrap();
    let elections = elections_of(&elections_tx);
    genesis_block.add_transaction(elections_tx);
    genesis_block.mine_hash();

    let mut chain = Chain::new(genesis_block);
    assert!(chain.is_chain_valid());

    // Seed the next block with the genesis block's unconsumed pool
    let pool = chain.block_at(0).unwrap().unconsumed_outputs().to_vec();
    let mut block = Block::new(chain.latest_block_hash(), "v1", 1, pool);

    let open_elections = block.get_open_elections(Some(caller.public_key()));
    assert_eq!(1, open_elections.len());
    let input = TransactionInput::from_output(open_elections[0].clone());
    let vote_tx = voter.vote("a1", &elections, vec![input]).unwrap();
    block.add_transaction(vote_tx);
    block.mine_hash();

    assert!(chain.add_block(block));
    assert_eq!(2, chain.len());
    assert!(chain.is_chain_valid());

    let json = chain.to_json().unwrap();
    let restored: Chain = serde_json::from_str(&json).unwrap();
    assert!(restored.is_chain_valid());
}

#[test]
fn test_chain_rejects_unlinked_block() {
    init_logging();
    let mut genesis_block = Block::new("0", "v1", 1, Vec::new());
    genesis_block.mine_hash();
    let mut chain = Chain::new(genesis_block);

    let mut stray_block = Block::new("some other hash", "v1", 1, Vec::new());
    stray_block.mine_hash();

    assert!(!chain.add_block(stray_block));
    assert_eq!(1, chain.len());
}

#[test]
fn test_mining_cancelled_from_another_thread() {
    init_logging();
    // Difficulty 64 is practically unminable, so only cancellation stops it
    let mut block = Block::new("0", "v1", 64, Vec::new());
    let cancel = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&cancel);
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(20));
        flag.store(true, Ordering::Relaxed);
    });

    assert!(!block.mine_hash_cancellable(&cancel));
    canceller.join().unwrap();

    assert_eq!("", block.hash());
    assert!(!block.is_block_valid());
}
