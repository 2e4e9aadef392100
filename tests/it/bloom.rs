// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use colpack::bloom::{DEFAULT_BLOOM_FPP, DEFAULT_BLOOM_SEED};
use colpack::{BloomFilter, Error};

#[test]
fn no_false_negatives() {
    let mut filter = BloomFilter::try_new(1000, DEFAULT_BLOOM_FPP).unwrap();
    for v in 0..1000i64 {
        filter.insert_i64(v);
    }
    assert!((0..1000i64).all(|v| filter.find_i64(v)));
}

#[test]
fn false_positive_rate() {
    let mut filter = BloomFilter::try_new(1000, 0.05).unwrap();
    for v in 0..1000i64 {
        filter.insert_i64(v);
    }
    let false_positives = (1_000_000..1_010_000i64)
        .filter(|v| filter.find_i64(*v))
        .count();
    assert!(false_positives <= 1000, "{false_positives}");
}

#[test]
fn byte_keys() {
    let mut filter = BloomFilter::with_seed(1000, 0.01, DEFAULT_BLOOM_SEED).unwrap();
    for i in 0..1000 {
        filter.insert_bytes(format!("key-{i}").as_bytes());
    }
    assert!((0..1000).all(|i| filter.find_bytes(format!("key-{i}").as_bytes())));
    let false_positives = (1000..11000)
        .filter(|i| filter.find_bytes(format!("key-{i}").as_bytes()))
        .count();
    assert!(false_positives <= 200, "{false_positives}");
}

#[test]
fn serialized_size() {
    let filter = BloomFilter::try_new(1000, 0.05).unwrap();
    assert_eq!(filter.serialize().len() * 8, filter.num_bits());
    assert_eq!(filter.num_bits() % 8, 0);
    assert!(filter.serialize().iter().all(|b| *b == 0));
}

#[test]
fn invalid_probability() {
    assert!(matches!(
        BloomFilter::try_new(100, 1.0),
        Err(Error::OutOfSpec(_))
    ));
}
