use chrono::{DateTime, TimeZone, Utc};
use fake::faker::chrono::en::DateTimeBetween;
use fake::faker::lorem::en::Words;
use fake::{Fake, Faker};
use finance_repo::transaction_repo::{NewTransaction, TransactionType};
use rand::seq::SliceRandom;
use rust_decimal::Decimal;

trait Generator<T> {
    fn gen(&mut self) -> T;
}

struct Predefined<T> {
    values: Vec<T>,
    current_pos: usize,
}

impl<T> Predefined<T> {
    fn boxed(values: Vec<T>) -> Box<Predefined<T>> {
        Box::new(Predefined {
            values,
            current_pos: 0,
        })
    }
}

impl<T: Clone> Generator<T> for Predefined<T> {
    fn gen(&mut self) -> T {
        let v = self.values[self.current_pos].clone();
        self.current_pos += 1;
        v
    }
}

struct RandomSample<T> {
    values: Vec<T>,
}

impl<T> RandomSample<T> {
    fn boxed(values: Vec<T>) -> Box<RandomSample<T>> {
        Box::new(RandomSample { values })
    }
}

impl<T: Clone> Generator<T> for RandomSample<T> {
    fn gen(&mut self) -> T {
        self.values.choose(&mut rand::thread_rng()).unwrap().clone()
    }
}

struct FakeTitle;

impl Generator<String> for FakeTitle {
    fn gen(&mut self) -> String {
        let words: Vec<String> = Words(1..4).fake();
        words.join(" ")
    }
}

struct FakeDate;

impl Generator<DateTime<Utc>> for FakeDate {
    fn gen(&mut self) -> DateTime<Utc> {
        let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        DateTimeBetween(start, end).fake()
    }
}

struct FakeAmount;

impl Generator<Decimal> for FakeAmount {
    fn gen(&mut self) -> Decimal {
        // cents, kept well inside what a NUMERIC column round-trips exactly
        Decimal::new(Faker.fake::<u32>() as i64 % 1_000_000, 2)
    }
}

#[allow(dead_code)]
pub struct NewTransactionGenerator {
    amnt_gen: Box<dyn Generator<Decimal>>,
    title_gen: Box<dyn Generator<String>>,
    date_gen: Box<dyn Generator<DateTime<Utc>>>,
    method_gen: Box<dyn Generator<String>>,
    cat_gen: Box<dyn Generator<String>>,
    type_gen: Box<dyn Generator<TransactionType>>,
}

#[allow(dead_code)]
impl NewTransactionGenerator {
    pub fn with_dates(mut self, dates: Vec<DateTime<Utc>>) -> NewTransactionGenerator {
        self.date_gen = Predefined::boxed(dates);
        self
    }

    pub fn with_amounts(mut self, amounts: Vec<Decimal>) -> NewTransactionGenerator {
        self.amnt_gen = Predefined::boxed(amounts);
        self
    }

    pub fn with_types(mut self, types: Vec<TransactionType>) -> NewTransactionGenerator {
        self.type_gen = Predefined::boxed(types);
        self
    }

    pub fn generate(&mut self) -> NewTransaction {
        NewTransaction::new(
            self.amnt_gen.gen(),
            self.title_gen.gen(),
            self.date_gen.gen(),
            self.method_gen.gen(),
            self.cat_gen.gen(),
            self.type_gen.gen(),
        )
    }

    pub fn generate_many(&mut self, count: usize) -> Vec<NewTransaction> {
        let mut vec = Vec::with_capacity(count);
        for _ in 0..count {
            vec.push(self.generate())
        }
        vec
    }
}

impl Default for NewTransactionGenerator {
    fn default() -> Self {
        NewTransactionGenerator {
            amnt_gen: Box::new(FakeAmount),
            title_gen: Box::new(FakeTitle),
            date_gen: Box::new(FakeDate),
            method_gen: RandomSample::boxed(vec![
                "Card".to_string(),
                "Cash".to_string(),
                "Bank Transfer".to_string(),
            ]),
            cat_gen: RandomSample::boxed(vec![
                "Groceries".to_string(),
                "Eating Out".to_string(),
                "Salary".to_string(),
                "Transportation".to_string(),
            ]),
            type_gen: RandomSample::boxed(vec![TransactionType::Income, TransactionType::Expense]),
        }
    }
}
