//! Natural-language samples shared by the unit tests

/// Plain English prose, roughly 1700 letters.
pub const ENGLISH_SAMPLE: &str = "\
It was late in the autumn when the old keeper of the lighthouse finally agreed to tell \
the story of the winter storm. He sat near the window with a cup of tea in his hands and \
watched the grey water roll against the rocks below. The storm, he said, had come without \
warning on the first night of December. The wind rose so quickly that the boats in the \
harbour were torn from their moorings before the fishermen could reach them. Waves broke \
over the sea wall and flooded the streets of the village, and the people gathered in the \
church on the hill because it was the only building high enough to stay dry. For three \
days the light at the top of the tower was the only thing that kept the ships away from \
the reef. The keeper climbed the stairs every hour to clean the glass and trim the wick, \
and on the second night the great lens cracked from the cold. He repaired it with wire \
and strips of canvas, working by the light of a small lantern while the whole tower \
shook around him. When the storm finally passed, the village counted the damage. Many \
houses had lost their roofs, the bridge over the river had been carried out to sea, and \
half of the fishing fleet was gone. Yet not a single ship had been wrecked on the reef, \
and not one life had been lost on the water. The mayor wanted to give the keeper a medal, \
but he refused it and asked only for a new lens and enough oil to last the rest of the \
winter. People in the village still tell the story to their children, and every year on \
the first night of December they light candles in their windows to remember the keeper \
who stayed awake for three days so that the sailors could find their way home. The old \
man smiled when he reached the end of the story and said that he had only done his job, \
and that the sea had been kind to let him keep the light burning when it mattered most.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn test_sample_is_long_enough() {
        assert!(normalize(ENGLISH_SAMPLE).len() >= 1500);
    }
}
