// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use murmur_crypto::Keypair;

pub fn run() {
    let keypair = Keypair::generate();
    println!("public:  {}", keypair.public_hex());
    println!("secret:  {}", keypair.secret_hex());
}
