//! Toy workloads for the demo binary and harness benches
//!
//! Small CPU- and allocation-heavy snippets: recursive Fibonacci, a sieve of
//! Eratosthenes, dense matrix multiply, and element-wise array transforms.

use rand::Rng;

/// Naive doubly-recursive Fibonacci
pub fn fibonacci(n: u32) -> u64 {
    if n <= 1 {
        return n as u64;
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}

/// All primes `<= n`
pub fn sieve(n: usize) -> Vec<usize> {
    let mut is_prime = vec![true; n + 1];
    let mut i = 2;
    while i * i <= n {
        if is_prime[i] {
            let mut j = i * i;
            while j <= n {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }

    is_prime
        .iter()
        .enumerate()
        .skip(2)
        .filter_map(|(num, &prime)| prime.then_some(num))
        .collect()
}

/// Multiply two random `size x size` matrices
pub fn matrix_multiply(size: usize) -> Vec<Vec<f64>> {
    let mut rng = rand::thread_rng();
    let a: Vec<Vec<f64>> = (0..size)
        .map(|_| (0..size).map(|_| rng.gen()).collect())
        .collect();
    let b: Vec<Vec<f64>> = (0..size)
        .map(|_| (0..size).map(|_| rng.gen()).collect())
        .collect();

    multiply(&a, &b)
}

/// Textbook triple-loop product of square matrices
pub fn multiply(a: &[Vec<f64>], b: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let size = a.len();
    let mut c = vec![vec![0.0; size]; size];
    for i in 0..size {
        for j in 0..size {
            for k in 0..size {
                c[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    c
}

/// Summary of one `array_ops` pass
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayOpsSummary {
    pub products: usize,
    pub dot: f64,
    pub above_half: usize,
    pub squared_sum: f64,
}

/// Element-wise product, dot product, filter and square over random arrays
pub fn array_ops(size: usize) -> ArrayOpsSummary {
    let mut rng = rand::thread_rng();
    let xs: Vec<f64> = (0..size).map(|_| rng.gen()).collect();
    let ys: Vec<f64> = (0..size).map(|_| rng.gen()).collect();

    let products: Vec<f64> = xs.iter().zip(&ys).map(|(x, y)| x * y).collect();
    let dot: f64 = xs.iter().zip(&ys).map(|(x, y)| x * y).sum();
    let filtered: Vec<f64> = xs.iter().copied().filter(|&x| x > 0.5).collect();
    let squared: Vec<f64> = filtered.iter().map(|x| x * x).collect();

    ArrayOpsSummary {
        products: products.len(),
        dot,
        above_half: filtered.len(),
        squared_sum: squared.iter().sum(),
    }
}
